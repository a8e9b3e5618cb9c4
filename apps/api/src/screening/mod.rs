// Resume screening: scoring candidates against a job description and ranking them.
// Extraction lives in `parsing`; this module only combines its outputs.

pub mod handlers;
pub mod pipeline;
pub mod ranker;
pub mod scoring;
