use posterpick::imdb::scrape::*;

const TITLE_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<title>The Shawshank Redemption (1994) - IMDb</title>
</head><body>
<a class="ipc-lockup-overlay" href="/title/tt0111161/mediaviewer/rm1690056449/?ref_=tt_ov_i" aria-label="View Poster"></a>
<a href="/title/tt0111161/mediaviewer/rm999/?ref_=tt_mv">second</a>
</body></html>"#;

const MEDIA_PAGE: &str = r#"<html><body>
<img src="//fls-na.amazon.com/1/batch/1/OP/pixel" width="1" height="1" />
<img alt="The Shawshank Redemption" class="poster" src="https://m.media-amazon.com/images/M/MV5BNDE3ODcx._V1_.jpg" />
<img src='https://m.media-amazon.com/images/M/second._V1_.png'/>
<img src="https://m.media-amazon.com/images/M/MV5BNDE3ODcx._V1_.jpg">
<img alt="no source here" />
</body></html>"#;

#[test]
fn test_extract_title() {
    assert_eq!(
        extract_title(TITLE_PAGE),
        Some("The Shawshank Redemption".to_string())
    );
    assert_eq!(
        extract_title("<title>Tom &amp; Jerry - IMDb</title>"),
        Some("Tom & Jerry".to_string())
    );
    assert_eq!(extract_title("<html></html>"), None);
    assert_eq!(extract_title("<title>  </title>"), None);
}

#[test]
fn test_extract_media_path_takes_first_link() {
    assert_eq!(
        extract_media_path(TITLE_PAGE),
        Some("mediaviewer/rm1690056449/?ref_=tt_ov_i".to_string())
    );
    assert_eq!(extract_media_path("<a href=\"/title/tt1/\">x</a>"), None);
}

#[test]
fn test_extract_image_sources_filters_tracking_pixels() {
    let sources = extract_image_sources(MEDIA_PAGE);

    assert_eq!(
        sources,
        vec![
            "https://m.media-amazon.com/images/M/MV5BNDE3ODcx._V1_.jpg".to_string(),
            "https://m.media-amazon.com/images/M/second._V1_.png".to_string(),
        ]
    );
}

#[test]
fn test_extract_image_sources_empty_page() {
    assert!(extract_image_sources("<html><body>nothing</body></html>").is_empty());
}

#[test]
fn test_extension_from_url() {
    assert_eq!(
        extension_from_url("https://m.media-amazon.com/images/M/MV5B@._V1_QL75_UX190_CR0,2,190,281_.jpg"),
        Some("jpg".to_string())
    );
    assert_eq!(
        extension_from_url("https://example.com/poster.JPEG?size=large#top"),
        Some("jpg".to_string())
    );
    assert_eq!(
        extension_from_url("https://example.com/poster.png"),
        Some("png".to_string())
    );
    assert_eq!(extension_from_url("https://example.com/poster"), None);
    assert_eq!(extension_from_url("https://example.com/page.html"), None);
}

#[test]
fn test_extension_from_content_type() {
    assert_eq!(
        extension_from_content_type("image/jpeg"),
        Some("jpg".to_string())
    );
    assert_eq!(
        extension_from_content_type("image/webp; charset=binary"),
        Some("webp".to_string())
    );
    assert_eq!(extension_from_content_type("text/html"), None);
}
