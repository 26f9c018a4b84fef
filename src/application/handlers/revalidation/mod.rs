//! Cache revalidation gateway.

mod revalidate_content;

pub use revalidate_content::{
    RevalidateContentCommand, RevalidateContentHandler, RevalidationError,
};
