pub mod codec;
pub mod handle;
pub mod model;
pub mod naming;
pub mod repository;
pub mod repository_fs;
pub mod route;
pub mod schema;
pub mod service;
pub mod validator;
pub mod view;

pub use codec::RasterCodec;
pub use repository_fs::FsImageStore;
pub use service::GalleryService;
