use std::sync::Arc;

use actix_web::{
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use image::{DynamicImage, GenericImageView, RgbImage};

use crate::configs::GalleryConfig;
use crate::constants::FLASH_COOKIE;
use crate::modules::gallery::{
    codec::ImageCodec, model::ImageKind, route, FsImageStore, GalleryService, RasterCodec,
};

const BOUNDARY: &str = "galleryTestBoundary7MA4YWxk";

fn service_for(dir: &tempfile::TempDir, max_upload_size: usize) -> GalleryService {
    let mut config =
        GalleryConfig::for_dirs(dir.path().join("uploads"), dir.path().join("thumbnails"));
    config.max_upload_size = max_upload_size;
    std::fs::create_dir_all(&config.upload_dir).unwrap();
    std::fs::create_dir_all(&config.thumbnail_dir).unwrap();
    GalleryService::with_dependencies(
        Arc::new(FsImageStore::new(&config)),
        Arc::new(RasterCodec::default()),
        Arc::new(config),
    )
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    RasterCodec::default().encode(&img, ImageKind::Jpeg).unwrap()
}

fn multipart(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_upload(path: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(path)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn flash_of(resp: &ServiceResponse) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == FLASH_COOKIE)
        .map(|c| c.value().to_string())
}

fn location_of(resp: &ServiceResponse) -> String {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string()
}

fn dir_names(path: std::path::PathBuf) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[actix_web::test]
async fn test_upload_then_browse_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024 * 1024)))
            .configure(route::configure),
    )
    .await;

    let body = multipart("image", "cat.jpg", &jpeg(640, 360));
    let resp = test::call_service(&app, post_upload("/", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), "/");
    assert_eq!(flash_of(&resp).as_deref(), Some("success:File successfully uploaded"));

    let body = multipart("image", "cat.jpg", &jpeg(90, 400));
    let resp = test::call_service(&app, post_upload("/", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert_eq!(dir_names(dir.path().join("uploads")), vec!["cat-001.jpg", "cat.jpg"]);
    assert_eq!(
        dir_names(dir.path().join("thumbnails")),
        vec!["cat-001-thumb.jpg", "cat-thumb.jpg"]
    );

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(actix_web::cookie::Cookie::new(FLASH_COOKIE, "success:File successfully uploaded"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp.response().cookies().find(|c| c.name() == FLASH_COOKIE).unwrap();
    assert_eq!(cleared.value(), "");
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("File successfully uploaded"));
    assert!(html.contains("/uploads/cat.jpg"));
    assert!(html.contains("/thumbnails/cat-001-thumb.jpg"));

    let req = test::TestRequest::get().uri("/thumbnails/cat-thumb.jpg").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    let thumb = test::read_body(resp).await;
    assert_eq!(image::load_from_memory(&thumb).unwrap().dimensions(), (300, 300));

    let req = test::TestRequest::get().uri("/uploads/cat-001.jpg").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let original = test::read_body(resp).await;
    assert_eq!(image::load_from_memory(&original).unwrap().dimensions(), (90, 400));
}

#[actix_web::test]
async fn test_fake_image_redirects_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024 * 1024)))
            .configure(route::configure),
    )
    .await;

    let body = multipart("image", "fake.png", b"this is not a picture");
    let resp = test::call_service(&app, post_upload("/index/", body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), "/index/");
    assert_eq!(flash_of(&resp).as_deref(), Some("danger:File must be an image"));
    assert!(dir_names(dir.path().join("uploads")).is_empty());
    assert!(dir_names(dir.path().join("thumbnails")).is_empty());
}

#[actix_web::test]
async fn test_missing_field_requires_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024 * 1024)))
            .configure(route::configure),
    )
    .await;

    let body = multipart("attachment", "cat.jpg", &jpeg(8, 8));
    let resp = test::call_service(&app, post_upload("/", body).to_request()).await;
    assert_eq!(flash_of(&resp).as_deref(), Some("danger:File required"));
    assert!(dir_names(dir.path().join("uploads")).is_empty());
}

#[actix_web::test]
async fn test_oversized_upload_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024 * 1024)))
            .configure(route::configure),
    )
    .await;

    // a text file: a size check that ran after validation would report "not an image"
    let body = multipart("image", "huge.png", &vec![b'a'; 1024 * 1024 + 1]);
    let resp = test::call_service(&app, post_upload("/", body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash_of(&resp).as_deref(), Some("danger:File too large (max 1 MiB)"));
    assert!(dir_names(dir.path().join("uploads")).is_empty());
}

#[actix_web::test]
async fn test_raw_routes_only_serve_stored_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(dir.path().join("secret.png"), b"outside").unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024)))
            .configure(route::configure),
    )
    .await;

    for uri in ["/uploads/missing.png", "/uploads/..%2Fsecret.png", "/thumbnails/nothing.jpg"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_json_listing_and_theme_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_for(&dir, 1024 * 1024);
    service
        .upload(Some(crate::modules::gallery::model::IncomingFile {
            filename: "dog.jpg".to_string(),
            bytes: jpeg(20, 20),
        }))
        .await
        .unwrap();
    let app = test::init_service(
        App::new().app_data(web::Data::new(service)).configure(route::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/images").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["image"], "dog.jpg");
    assert_eq!(body["data"][0]["thumbnail"], "dog-thumb.jpg");
    assert_eq!(body["message"], "Images retrieved successfully");

    let req = test::TestRequest::get().uri("/?theme=darkly").to_request();
    let resp = test::call_service(&app, req).await;
    let theme = resp.response().cookies().find(|c| c.name() == "theme").unwrap();
    assert_eq!(theme.value(), "darkly");

    let req = test::TestRequest::get().uri("/index/").to_request();
    let resp = test::call_service(&app, req).await;
    let theme = resp.response().cookies().find(|c| c.name() == "theme").unwrap();
    assert_eq!(theme.value(), "flatty");
}

#[actix_web::test]
async fn test_exhausted_name_redirects_with_rename_notice() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_for(&dir, 1024 * 1024);
    let bytes = jpeg(4, 4);
    std::fs::write(dir.path().join("uploads/cat.jpg"), &bytes).unwrap();
    for i in 1..=999 {
        std::fs::write(dir.path().join(format!("uploads/cat-{i:03}.jpg")), &bytes).unwrap();
    }
    let app = test::init_service(
        App::new().app_data(web::Data::new(service)).configure(route::configure),
    )
    .await;

    let body = multipart("image", "cat.jpg", &bytes);
    let resp = test::call_service(&app, post_upload("/", body).to_request()).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&resp), "/");
    assert_eq!(
        flash_of(&resp).as_deref(),
        Some("danger:Too many files named cat.jpg, please rename it")
    );
    assert_eq!(dir_names(dir.path().join("uploads")).len(), 1000);
    assert!(dir_names(dir.path().join("thumbnails")).is_empty());
}

#[actix_web::test]
async fn test_page_links_are_percent_encoded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
    std::fs::write(dir.path().join("uploads/my cat#1.jpg"), jpeg(4, 4)).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service_for(&dir, 1024 * 1024)))
            .configure(route::configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("href=\"/uploads/my%20cat%231.jpg\""));
    assert!(html.contains("no thumbnail available"));

    let req = test::TestRequest::get().uri("/uploads/my%20cat%231.jpg").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
