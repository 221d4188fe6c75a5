mod mailer;
mod renderer;

pub use mailer::{ReportAttachment, ReportMailer, ResendMailer};
pub use renderer::{DocumentRenderer, RenderContext, TextDocumentRenderer};
