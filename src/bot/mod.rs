//! Bot orchestration: event classification, the dialogue router and the
//! teloxide dispatcher that feeds it.

pub mod dispatch;
pub mod event;
pub mod router;

pub use event::{classify, Content, Inbound, MediaKind, Payload, Route, Sender};
pub use router::{HandlerError, Router, RouterSettings};
