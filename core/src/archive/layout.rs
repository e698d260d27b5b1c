// Embedded asset layout of a packaged application archive. Fixed; the
// validator does not accept alternate layouts.

/// Directory holding one `<model_id>.json` file per in-use model.
pub const MODEL_DIRECTORY_PREFIX: &str = "assets/assets/75f/models/";

/// Versions manifest enumerating every in-use model.
pub const VERSION_MANIFEST_PATH: &str = "assets/assets/75f/versions.json";

pub fn model_file_path(model_id: &str) -> String {
    format!("{}{}.json", MODEL_DIRECTORY_PREFIX, model_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_file_path_joins_directory_and_id() {
        assert_eq!(
            model_file_path("schedule"),
            "assets/assets/75f/models/schedule.json"
        );
    }
}
