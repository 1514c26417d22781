pub mod error;
pub mod inference;
pub mod types;

pub use error::{GatewayError, GatewayErrorKind};
pub use inference::InferenceGateway;
pub use types::{CutDecision, Decision, FeatureVector};
