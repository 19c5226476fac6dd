//! Entry rendering subsystem.
//!
//! [`entry`] turns raw annotated article text into display markup; [`markup`] parses that
//! markup into styled lines for the terminal.

pub mod entry;
pub mod markup;

pub use entry::{render_entry, EntryMeta, EntryRenderer};
pub use markup::{parse_markup, RenderedEntry, Segment, SegmentStyle};
