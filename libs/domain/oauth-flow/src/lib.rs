// [libs/domain/oauth-flow/src/lib.rs]
mod errors;
mod flow;
mod html;

pub use errors::OAuthFlowError;
pub use flow::{callback, install, CallbackOutcome};
pub use html::render_success;
