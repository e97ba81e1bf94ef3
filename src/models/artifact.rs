use serde::Serialize;

/// One fetched source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    /// Location inside the source (relative path or object key).
    pub key: String,
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub size: u64,
}

impl Artifact {
    pub fn new(key: &str, content: Vec<u8>) -> Self {
        let filename = key.rsplit('/').next().unwrap_or(key).to_string();
        Self {
            key: key.to_string(),
            filename,
            size: content.len() as u64,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_last_key_segment() {
        let artifact = Artifact::new("raw/2024/section.json", b"{}".to_vec());
        assert_eq!(artifact.filename, "section.json");
        assert_eq!(artifact.size, 2);
    }

    #[test]
    fn bare_key_is_its_own_filename() {
        let artifact = Artifact::new("page.html", Vec::new());
        assert_eq!(artifact.filename, "page.html");
        assert_eq!(artifact.size, 0);
    }
}
