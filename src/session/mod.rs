//! Headless driving of the demo page: a manual clock pumping one shared coordinator, with
//! rendered frames handed to a [`sink::FrameSink`].

pub mod headless;
pub mod sink;
