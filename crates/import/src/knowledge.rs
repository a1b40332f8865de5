use ledgerlift_core::{ConversionProfile, Record};
use serde::Serialize;
use std::collections::HashMap;

use crate::normalize::normalize;
use crate::similarity::{are_similar, contains_either};

/// A merchant learned from the categorized export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearnedMerchant {
    pub key: String,
    /// First original spelling seen for this key, trimmed.
    pub display_name: String,
    /// Most frequent category for this key.
    pub category: String,
}

/// Everything learned from one reference export. Merchants are kept in
/// first-seen order; every substring scan walks that order and the first hit
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantKnowledge {
    merchants: Vec<LearnedMerchant>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    dominant_account: String,
}

/// Per-key accumulator used while scanning the reference rows.
struct Tally {
    display_name: String,
    categories: Vec<(String, usize)>,
}

impl Tally {
    fn bump(&mut self, category: &str) {
        match self.categories.iter_mut().find(|(c, _)| c == category) {
            Some((_, n)) => *n += 1,
            None => self.categories.push((category.to_string(), 1)),
        }
    }

    /// Highest count; on ties the category seen first.
    fn winner(self) -> Option<String> {
        let mut best: Option<(String, usize)> = None;
        for (category, n) in self.categories {
            if best.as_ref().map_or(true, |(_, m)| n > *m) {
                best = Some((category, n));
            }
        }
        best.map(|(c, _)| c)
    }
}

impl MerchantKnowledge {
    pub fn learn(reference: &[Record], profile: &ConversionProfile) -> Self {
        let schema = &profile.reference;
        let mut order: Vec<String> = Vec::new();
        let mut tallies: HashMap<String, Tally> = HashMap::new();
        let mut skipped = 0usize;

        for row in reference {
            let merchant = row.get_or_empty(&schema.merchant_field).trim();
            let category = row.get_or_empty(&schema.category_field).trim();

            if merchant.is_empty() || category.is_empty() {
                skipped += 1;
                continue;
            }

            let key = normalize(merchant);
            let tally = tallies.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                Tally {
                    display_name: merchant.to_string(),
                    categories: Vec::new(),
                }
            });
            tally.bump(category);
        }

        if skipped > 0 {
            tracing::debug!(skipped, "reference rows without merchant or category ignored");
        }

        let mut merchants = Vec::with_capacity(order.len());
        let mut index = HashMap::with_capacity(order.len());
        for key in order {
            let Some(tally) = tallies.remove(&key) else {
                continue;
            };
            let display_name = tally.display_name.clone();
            if let Some(category) = tally.winner() {
                index.insert(key.clone(), merchants.len());
                merchants.push(LearnedMerchant {
                    key,
                    display_name,
                    category,
                });
            }
        }

        let dominant_account = learn_account(reference, profile)
            .unwrap_or_else(|| profile.default_account.clone());

        tracing::info!(
            reference_rows = reference.len(),
            learned_merchants = merchants.len(),
            account = %dominant_account,
            "learned merchant knowledge"
        );

        Self {
            merchants,
            index,
            dominant_account,
        }
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }

    /// Learned merchants in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &LearnedMerchant> {
        self.merchants.iter()
    }

    pub fn dominant_account(&self) -> &str {
        &self.dominant_account
    }

    pub fn get(&self, key: &str) -> Option<&LearnedMerchant> {
        self.index.get(key).map(|&i| &self.merchants[i])
    }

    pub fn category_of(&self, key: &str) -> Option<&str> {
        self.get(key).map(|m| m.category.as_str())
    }

    pub fn display_name_of(&self, key: &str) -> Option<&str> {
        self.get(key).map(|m| m.display_name.as_str())
    }

    /// First learned merchant, in learning order, whose key equals `key` or
    /// where one key contains the other. An empty key is contained in every
    /// key, so it takes the first learned merchant.
    pub fn first_containing(&self, key: &str) -> Option<&LearnedMerchant> {
        self.merchants
            .iter()
            .find(|m| m.key == key || contains_either(key, &m.key))
    }

    /// Exact key first, then the first substring hit in learning order.
    pub fn lookup(&self, key: &str) -> Option<&LearnedMerchant> {
        self.get(key).or_else(|| self.first_containing(key))
    }

    /// Learned merchants that look like the same business as `merchant` under
    /// the word-overlap heuristic. Diagnostic only; never used to categorize.
    pub fn near_misses(&self, merchant: &str) -> Vec<&LearnedMerchant> {
        self.merchants
            .iter()
            .filter(|m| are_similar(merchant, &m.display_name))
            .collect()
    }
}

/// Most frequent non-empty account label, ties going to the first seen.
fn learn_account(reference: &[Record], profile: &ConversionProfile) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for row in reference {
        let Some(account) = row.get(&profile.reference.account_field) else {
            continue;
        };
        if account.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(a, _)| *a == account) {
            Some((_, n)) => *n += 1,
            None => counts.push((account, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (account, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((account, n));
        }
    }
    best.map(|(a, _)| a.to_string())
}
