//! examkit-report renders exam reports for humans.
//!
//! JSON persistence lives on [`examkit_core::report::ExamReport`] itself;
//! this crate adds the self-contained HTML page.

pub mod html;

pub use html::{generate_html, write_html_report};
