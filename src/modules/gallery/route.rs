use actix_web::web;

use crate::modules::gallery::handle::*;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/", "/index/"])
            .route(web::get().to(index))
            .route(web::post().to(upload)),
    )
    .service(get_upload)
    .service(get_thumbnail)
    .service(list_images);
}
