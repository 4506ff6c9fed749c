/// Name constants shared by the store client and the directory components.

// Remote tables
pub const HELPERS_TABLE: &str = "helpers";
pub const CATEGORIES_TABLE: &str = "categories";

// PostgREST path prefix under a Supabase project URL
pub const REST_PATH: &str = "rest/v1";

// Environment variable holding the store API key
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

// Social platform keys, in render order
pub const SOCIAL_PLATFORMS: [&str; 3] = ["instagram", "twitter", "linkedin"];
