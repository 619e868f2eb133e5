pub mod normalize;
pub mod response;
pub mod statement;

pub use normalize::{classify_type, coerce_date, normalize_records, NormalizeError};
pub use response::{parse_transactions, ResponseParseError};
pub use statement::{read_statement, StatementError};
