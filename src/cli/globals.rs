use std::path::PathBuf;

/// Arguments shared by every action.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_file: PathBuf) -> Self {
        Self {
            api_url,
            session_file,
        }
    }
}
