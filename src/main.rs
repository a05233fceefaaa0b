use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use crate::{
    configs::{prepare_directories, GalleryConfig},
    modules::gallery::{FsImageStore, GalleryService, RasterCodec},
};

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;
mod utils;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let env = constants::Env::load().map_err(std::io::Error::other)?;
    let config = Arc::new(GalleryConfig::from_env(&env));

    prepare_directories(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Storage setup error: {e}")))?;

    let store = Arc::new(FsImageStore::new(&config));
    let gallery_service =
        GalleryService::with_dependencies(store, Arc::new(RasterCodec::default()), config.clone());

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(gallery_service.clone()))
            .configure(modules::gallery::route::configure)
    })
    .bind((env.ip.as_str(), env.port))?
    .run()
    .await
}
