use ledgerlift_core::{Amount, ConversionProfile, OutputRecord, Record};

use crate::knowledge::MerchantKnowledge;
use crate::normalize::normalize;
use crate::util::{capitalize_words, title_case_with};

/// Maps one bank export row onto the import schema. Malformed or missing
/// fields degrade to empty strings or defaults; this never fails.
pub fn transform(
    raw: &Record,
    knowledge: &MerchantKnowledge,
    profile: &ConversionProfile,
) -> OutputRecord {
    let schema = &profile.source;
    let raw_merchant = raw.get_or_empty(&schema.merchant_field);

    OutputRecord {
        date: raw.get_or_empty(&schema.date_field).to_string(),
        merchant: merchant_name(raw_merchant, knowledge, profile),
        category: category(raw_merchant, knowledge, profile),
        account: knowledge.dominant_account().to_string(),
        original_statement: String::new(),
        notes: String::new(),
        amount: amount(raw.get_or_empty(&schema.amount_field)),
        tags: String::new(),
        owner: capitalize_words(raw.get_or_empty(&schema.cardholder_field)),
    }
}

/// Learned display name of the first matching merchant, else the raw name in
/// title case.
pub fn merchant_name(
    raw_merchant: &str,
    knowledge: &MerchantKnowledge,
    profile: &ConversionProfile,
) -> String {
    if raw_merchant.is_empty() {
        return String::new();
    }

    match knowledge.first_containing(&normalize(raw_merchant)) {
        Some(learned) => learned.display_name.clone(),
        None => title_case_with(raw_merchant, |w| profile.is_lowercase_word(w)),
    }
}

pub fn category(
    raw_merchant: &str,
    knowledge: &MerchantKnowledge,
    profile: &ConversionProfile,
) -> String {
    knowledge
        .lookup(&normalize(raw_merchant))
        .map(|learned| learned.category.clone())
        .unwrap_or_else(|| profile.uncategorized_label.clone())
}

fn amount(raw_amount: &str) -> String {
    Amount::parse_export(raw_amount)
        .map(|a| a.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    fn knowledge(rows: &[(&str, &str)]) -> MerchantKnowledge {
        let reference: Vec<Record> = rows
            .iter()
            .map(|&(m, c)| record(&[("Merchant", m), ("Category", c)]))
            .collect();
        MerchantKnowledge::learn(&reference, &ConversionProfile::default())
    }

    fn raw(merchant: &str) -> Record {
        record(&[
            ("Date", "2024-03-02"),
            ("Merchant Name", merchant),
            ("Name on Card", "JOHN SMITH"),
            ("Amount", "$-5.25"),
        ])
    }

    #[test]
    fn learned_merchant_is_renamed_and_categorized() {
        let k = knowledge(&[("Starbucks", "Coffee Shops")]);
        let out = transform(&raw("STARBUCKS #4521"), &k, &ConversionProfile::default());
        assert_eq!(out.merchant, "Starbucks");
        assert_eq!(out.category, "Coffee Shops");
        assert_eq!(out.account, "Rogers");
        assert_eq!(out.date, "2024-03-02");
        assert_eq!(out.amount, "-5.25");
        assert_eq!(out.owner, "John Smith");
    }

    #[test]
    fn placeholder_columns_are_blank() {
        let k = knowledge(&[("Starbucks", "Coffee Shops")]);
        let out = transform(&raw("STARBUCKS"), &k, &ConversionProfile::default());
        assert_eq!(out.original_statement, "");
        assert_eq!(out.notes, "");
        assert_eq!(out.tags, "");
    }

    #[test]
    fn unknown_merchant_is_uncategorized_and_title_cased() {
        let k = knowledge(&[("Starbucks", "Coffee Shops")]);
        let out = transform(
            &raw("THE BAY OF CANADA INC"),
            &k,
            &ConversionProfile::default(),
        );
        assert_eq!(out.category, "Uncategorized");
        assert_eq!(out.merchant, "the Bay of Canada inc");
    }

    #[test]
    fn learned_key_inside_raw_name_matches() {
        let k = knowledge(&[("Uber", "Taxi & Ride Shares")]);
        let out = transform(&raw("UBER* TRIP HELP.UBER.COM"), &k, &ConversionProfile::default());
        assert_eq!(out.merchant, "Uber");
        assert_eq!(out.category, "Taxi & Ride Shares");
    }

    #[test]
    fn raw_name_inside_learned_key_matches() {
        let k = knowledge(&[("Amazon.ca Marketplace", "Shopping")]);
        let out = transform(&raw("AMAZON"), &k, &ConversionProfile::default());
        assert_eq!(out.merchant, "Amazon.ca Marketplace");
        assert_eq!(out.category, "Shopping");
    }

    #[test]
    fn first_learned_candidate_wins() {
        let k = knowledge(&[
            ("Tim", "Misc"),
            ("Tim Hortons", "Coffee Shops"),
        ]);
        let p = ConversionProfile::default();
        // Substring scan walks learning order, so the earlier "Tim" wins the name.
        assert_eq!(merchant_name("TIM HORTONS #88", &k, &p), "Tim");
        assert_eq!(category("TIM HORTONS #88", &k, &p), "Misc");
        // Exact key beats order for the category.
        assert_eq!(category("Tim Hortons", &k, &p), "Coffee Shops");
    }

    #[test]
    fn missing_merchant_is_blank_but_takes_first_learned_category() {
        let k = knowledge(&[("Starbucks", "Coffee Shops"), ("Shell", "Gas")]);
        let out = transform(
            &record(&[("Amount", "1.00")]),
            &k,
            &ConversionProfile::default(),
        );
        assert_eq!(out.merchant, "");
        assert_eq!(out.category, "Coffee Shops");
        assert_eq!(out.date, "");
        assert_eq!(out.owner, "");
    }

    #[test]
    fn symbol_only_merchant_takes_first_learned_merchant() {
        let k = knowledge(&[("Starbucks", "Coffee Shops"), ("Shell", "Gas")]);
        let out = transform(&raw("***"), &k, &ConversionProfile::default());
        assert_eq!(out.merchant, "Starbucks");
        assert_eq!(out.category, "Coffee Shops");
    }

    #[test]
    fn symbol_only_merchant_without_knowledge_keeps_raw_name() {
        let k = knowledge(&[]);
        let out = transform(&raw("***"), &k, &ConversionProfile::default());
        assert_eq!(out.merchant, "***");
        assert_eq!(out.category, "Uncategorized");
    }

    #[test]
    fn unparseable_amount_is_blank() {
        let k = knowledge(&[]);
        let r = record(&[("Merchant Name", "Shell"), ("Amount", "abc")]);
        assert_eq!(transform(&r, &k, &ConversionProfile::default()).amount, "");
    }

    #[test]
    fn amount_grouping_and_sign_pass_through() {
        let k = knowledge(&[]);
        let r = record(&[("Amount", "$-12,345.67")]);
        assert_eq!(
            transform(&r, &k, &ConversionProfile::default()).amount,
            "-12345.67"
        );
    }

    #[test]
    fn owner_is_capitalized_per_word() {
        let k = knowledge(&[]);
        let r = record(&[("Name on Card", "jane q. doe")]);
        assert_eq!(transform(&r, &k, &ConversionProfile::default()).owner, "Jane Q. Doe");
    }

    #[test]
    fn custom_schema_fields_are_honoured() {
        let mut p = ConversionProfile::default();
        p.source.merchant_field = "Description".to_string();
        p.uncategorized_label = "Needs Review".to_string();
        let k = knowledge(&[("Shell", "Gas")]);
        let hit = transform(&record(&[("Description", "SHELL C0123")]), &k, &p);
        let miss = transform(&record(&[("Description", "Esso")]), &k, &p);
        assert_eq!(hit.category, "Gas");
        assert_eq!(miss.category, "Needs Review");
    }
}
