//! # System Interaction Layer
//!
//! Boundary between the core logic and the filesystem.
//!
//! - **`json_file`**: reading JSON documents and writing them back atomically,
//!   pretty-printed with tab indentation.

pub mod json_file;
