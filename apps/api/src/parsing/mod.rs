// Document parsing: bytes → text → candidate fields.
// Each extractor is a plain function over text; only name recognition needs an injected dependency.

pub mod contact;
pub mod name;
pub mod prompts;
pub mod skills;
pub mod text;
