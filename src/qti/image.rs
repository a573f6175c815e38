use crate::qti::escape;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

pub fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "image/png",
    }
}

pub fn is_image_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// `<material>` fragment referencing `images/<filename>`, or empty when there is no image.
pub fn image_tag(filename: Option<&str>) -> String {
    let name = match filename.map(str::trim) {
        Some(name) if !name.is_empty() => escape(name),
        _ => return String::new(),
    };
    format!(
        "    <material>\n      <matimage imagtype=\"{}\" uri=\"images/{}\" label=\"{}\" />\n    </material>\n",
        mime_for(&name),
        name,
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for("a.jpeg"), "image/jpeg");
        assert_eq!(mime_for("anim.gif"), "image/gif");
        assert_eq!(mime_for("x.bmp"), "image/png");
        assert_eq!(mime_for("noext"), "image/png");
    }

    #[test]
    fn absent_image_yields_nothing() {
        assert_eq!(image_tag(None), "");
        assert_eq!(image_tag(Some("  ")), "");
    }

    #[test]
    fn tag_points_into_images_dir() {
        let tag = image_tag(Some("photo.JPG"));
        assert!(tag.contains(r#"imagtype="image/jpeg""#));
        assert!(tag.contains(r#"uri="images/photo.JPG""#));
        assert!(tag.contains(r#"label="photo.JPG""#));
    }

    #[test]
    fn image_files_by_extension() {
        assert!(is_image_file("Fig1.PNG"));
        assert!(!is_image_file("list.csv"));
    }
}
