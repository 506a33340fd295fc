mod common;

use std::io::Cursor;

use common::page_server::{self, PageServer, Route};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use posterpick::{
    config::Settings,
    imdb::{FetchError, ImdbProvider, PosterProvider},
    types::Identifier,
};

const TITLE_PATH: &str = "/title/tt0111161/";
const MEDIA_PATH: &str = "/title/tt0111161/mediaviewer/rm1690056449/";

const TITLE_PAGE: &str = r#"<html><head><title>The Shawshank Redemption (1994) - IMDb</title></head>
<body><a class="poster" href="/title/tt0111161/mediaviewer/rm1690056449/?ref_=tt_ov_i">Poster</a></body></html>"#;

fn provider(server: &PageServer, candidates: u32) -> ImdbProvider {
    let settings = Settings {
        base_url: server.title_base(),
        candidates,
        thumbnail: None,
        ..Settings::default()
    };
    ImdbProvider::new(&settings).unwrap()
}

fn shawshank() -> Identifier {
    Identifier::parse("tt0111161").unwrap()
}

fn media_page(imgs: &[&str]) -> String {
    let tags: Vec<String> = imgs
        .iter()
        .map(|src| format!(r#"<img src="{src}" alt="poster">"#))
        .collect();
    format!(
        r#"<html><body>{}<img src="https://fls-na.amazon.com/1/batch/1/OP/A1" height="1"></body></html>"#,
        tags.join("\n")
    )
}

#[tokio::test]
async fn test_fetch_downloads_first_candidate_with_title() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&["/images/one.jpg", "/images/two.png"]))),
        ("/images/one.jpg", Route::bytes("image/jpeg", b"first poster".to_vec())),
        ("/images/two.png", Route::bytes("image/png", b"second poster".to_vec())),
    ]);

    let set = provider(&server, 1).fetch(&shawshank()).await.unwrap();

    assert_eq!(set.title.as_deref(), Some("The Shawshank Redemption"));
    assert_eq!(set.posters.len(), 1);
    assert_eq!(set.posters[0].bytes, b"first poster");
    assert_eq!(set.posters[0].extension, "jpg");
    assert_eq!(
        set.posters[0].source_url,
        format!("{}/images/one.jpg", server.base)
    );
    assert_eq!(
        server.requests(),
        vec![TITLE_PATH, MEDIA_PATH, "/images/one.jpg"]
    );
}

#[tokio::test]
async fn test_fetch_limits_candidates_in_page_order() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (
            MEDIA_PATH,
            Route::html(&media_page(&[
                "/images/one.jpg",
                "/images/two.png",
                "/images/three.jpg",
            ])),
        ),
        ("/images/one.jpg", Route::bytes("image/jpeg", b"first".to_vec())),
        ("/images/two.png", Route::bytes("image/png", b"second".to_vec())),
        ("/images/three.jpg", Route::bytes("image/jpeg", b"third".to_vec())),
    ]);

    let set = provider(&server, 2).fetch(&shawshank()).await.unwrap();

    let extensions: Vec<&str> = set.posters.iter().map(|p| p.extension.as_str()).collect();
    assert_eq!(extensions, vec!["jpg", "png"]);
    assert_eq!(set.posters[1].bytes, b"second");
    assert!(!server.requests().contains(&"/images/three.jpg".to_string()));
}

#[tokio::test]
async fn test_fetch_resolves_relative_sources_against_media_page() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&["still.jpg"]))),
        (
            "/title/tt0111161/mediaviewer/rm1690056449/still.jpg",
            Route::bytes("image/jpeg", b"still".to_vec()),
        ),
    ]);

    let set = provider(&server, 1).fetch(&shawshank()).await.unwrap();

    assert_eq!(
        set.posters[0].source_url,
        format!("{}/title/tt0111161/mediaviewer/rm1690056449/still.jpg", server.base)
    );
    assert_eq!(set.posters[0].bytes, b"still");
}

#[tokio::test]
async fn test_fetch_takes_extension_from_content_type() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&["/images/poster"]))),
        ("/images/poster", Route::bytes("image/png", b"png bytes".to_vec())),
    ]);

    let set = provider(&server, 1).fetch(&shawshank()).await.unwrap();

    assert_eq!(set.posters[0].extension, "png");
}

#[tokio::test]
async fn test_fetch_missing_title_is_not_found() {
    let server = page_server::start(vec![]);

    let err = provider(&server, 1).fetch(&shawshank()).await.unwrap_err();

    match err {
        FetchError::NotFound(url) => assert_eq!(url, format!("{}{}", server.base, TITLE_PATH)),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_server_error_is_http_error() {
    let server = page_server::start(vec![(TITLE_PATH, Route::status(500))]);

    let err = provider(&server, 1).fetch(&shawshank()).await.unwrap_err();

    assert!(matches!(err, FetchError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_title_page_without_media_link_is_malformed() {
    let server = page_server::start(vec![(
        TITLE_PATH,
        Route::html("<html><head><title>Captcha</title></head><body></body></html>"),
    )]);

    let err = provider(&server, 1).fetch(&shawshank()).await.unwrap_err();

    assert!(matches!(err, FetchError::Malformed(_)), "got {err:?}");
    assert_eq!(server.requests(), vec![TITLE_PATH]);
}

#[tokio::test]
async fn test_fetch_media_page_without_images_has_no_poster() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&[]))),
    ]);

    let err = provider(&server, 1).fetch(&shawshank()).await.unwrap_err();

    assert!(matches!(err, FetchError::NoPoster), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_empty_image_is_malformed() {
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&["/images/one.jpg"]))),
        ("/images/one.jpg", Route::bytes("image/jpeg", Vec::new())),
    ]);

    let err = provider(&server, 1).fetch(&shawshank()).await.unwrap_err();

    assert!(matches!(err, FetchError::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_shrinks_posters_to_thumbnail() {
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(290, 800))
        .write_to(&mut png, ImageFormat::Png)
        .unwrap();
    let server = page_server::start(vec![
        (TITLE_PATH, Route::html(TITLE_PAGE)),
        (MEDIA_PATH, Route::html(&media_page(&["/images/one.png", "/images/two.jpg"]))),
        ("/images/one.png", Route::bytes("image/png", png.into_inner())),
        ("/images/two.jpg", Route::bytes("image/jpeg", b"not an image".to_vec())),
    ]);
    let settings = Settings {
        base_url: server.title_base(),
        ..Settings::default()
    };
    let provider = ImdbProvider::new(&settings).unwrap();

    let set = provider.fetch(&shawshank()).await.unwrap();
    let poster = image::load_from_memory(&set.posters[0].bytes).unwrap();
    assert_eq!(poster.dimensions(), (145, 400));

    let settings = Settings {
        candidates: 2,
        ..settings
    };
    let err = ImdbProvider::new(&settings)
        .unwrap()
        .fetch(&shawshank())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)), "got {err:?}");
}
