use actix_multipart::Multipart;
use actix_web::{cookie::Cookie, get, http::header, web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;

use crate::api::{error, success};
use crate::constants::{THEME_COOKIE, UPLOAD_FIELD};
use crate::modules::gallery::{
    model::IncomingFile,
    schema::{pick_theme, GalleryEntry, ThemeQuery},
    service::GalleryService,
    view::render_index,
};
use crate::utils::Flash;

/// Gallery page
pub async fn index(
    service: web::Data<GalleryService>,
    query: web::Query<ThemeQuery>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let cookie_theme = req.cookie(THEME_COOKIE);
    let theme = pick_theme(query.theme.as_deref(), cookie_theme.as_ref().map(|c| c.value()));
    let flash = Flash::from_request(&req);

    let entries = service.list().await?;
    let html = render_index(&entries, flash.as_ref(), theme).into_string();

    let mut cookies = vec![Cookie::build(THEME_COOKIE, theme).path("/").finish()];
    if flash.is_some() {
        cookies.push(Flash::clear_cookie());
    }

    Ok(success::Success::page(html).cookies(cookies))
}

/// Upload form target; always redirects back to the page it was posted from
pub async fn upload(
    mut payload: Multipart,
    req: HttpRequest,
    service: web::Data<GalleryService>,
) -> Result<success::Success<()>, error::Error> {
    let result = match read_upload(&req, &mut payload, service.config().max_upload_size).await {
        Ok(file) => service.upload(file).await,
        Err(e) => Err(e),
    };

    let flash = match result {
        Ok(stored) => {
            log::info!(
                "Upload stored as {} ({}, thumbnail {})",
                stored.filename,
                stored.kind,
                stored.thumbnail
            );
            Flash::success("File successfully uploaded")
        }
        Err(e) => {
            let err = error::Error::from(e);
            match err.user_message() {
                Some(message) => Flash::danger(message),
                None => return Err(err),
            }
        }
    };

    Ok(success::Success::see_other(req.path()).cookies(vec![flash.into_cookie()]))
}

/// Pull the image field out of the form, enforcing the size ceiling while reading
async fn read_upload(
    req: &HttpRequest,
    payload: &mut Multipart,
    max_upload_size: usize,
) -> Result<Option<IncomingFile>, error::SystemError> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > max_upload_size) {
        return Err(error::SystemError::PayloadTooLarge(max_upload_size));
    }

    let malformed = |e: actix_multipart::MultipartError| {
        log::debug!("Rejecting malformed upload: {}", e);
        error::SystemError::bad_request("Malformed upload")
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > max_upload_size {
                return Err(error::SystemError::PayloadTooLarge(max_upload_size));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some(IncomingFile { filename, bytes }));
    }

    Ok(None)
}

#[get("/uploads/{filename}")]
pub async fn get_upload(
    service: web::Data<GalleryService>,
    filename: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let filename = filename.into_inner();
    let bytes = service.original(&filename).await?;
    Ok(raw_image(&filename, bytes))
}

#[get("/thumbnails/{filename}")]
pub async fn get_thumbnail(
    service: web::Data<GalleryService>,
    filename: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let filename = filename.into_inner();
    let bytes = service.thumbnail(&filename).await?;
    Ok(raw_image(&filename, bytes))
}

#[get("/api/images")]
pub async fn list_images(
    service: web::Data<GalleryService>,
) -> Result<success::Success<Vec<GalleryEntry>>, error::Error> {
    let entries = service.list().await?;
    Ok(success::Success::ok(Some(entries)).message("Images retrieved successfully"))
}

fn raw_image(filename: &str, bytes: Vec<u8>) -> HttpResponse {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    HttpResponse::Ok().content_type(mime.essence_str().to_string()).body(bytes)
}
