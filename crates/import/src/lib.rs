pub mod convert;
pub mod csv;
pub mod knowledge;
pub mod normalize;
pub mod session;
pub mod similarity;
pub mod transform;
pub(crate) mod util;

pub use convert::{
    convert, convert_batch, convert_with, BatchConversion, Conversion, ConversionStats,
    FileConversion, RawFile,
};
pub use crate::csv::{output_file_name, read_records, write_output, CsvError};
pub use knowledge::{LearnedMerchant, MerchantKnowledge};
pub use normalize::normalize;
pub use session::ConversionSession;
pub use similarity::are_similar;
pub use transform::transform;
