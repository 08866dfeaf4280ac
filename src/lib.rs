pub mod body;
pub mod extract;
pub mod message;
pub mod rank;
pub mod score;

pub use extract::{CandidateCode, CodeFormat};
pub use message::{BodyPart, Header, Message};
pub use rank::{aggregate, RankedCode, RankedLink, ScanResults};
pub use score::{is_domain_match, match_score};
