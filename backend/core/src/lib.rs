pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::CareError;
pub use event::{CallEvent, CallEventKind};
pub use traits::{
    CallLog, DiagnosisService, LlmProvider, LlmRequest, LlmResponse, NarrativeSummarizer,
};
pub use types::{DiagnosisReport, NarrativeSnapshot};
