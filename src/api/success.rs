use actix_web::{http::header, HttpResponse};
use std::borrow::Cow;

#[derive(serde::Serialize)]
pub struct SuccessData<T: serde::Serialize> {
    pub data: Option<T>,
    pub message: Option<Cow<'static, str>>,
}

pub enum SuccessBody<T: serde::Serialize> {
    Json(SuccessData<T>),
    Html(String),
}

pub struct Success<T: serde::Serialize> {
    pub status: actix_web::http::StatusCode,
    pub body: Option<SuccessBody<T>>,
    pub cookies: Vec<actix_web::cookie::Cookie<'static>>,
    pub location: Option<String>,
}

impl<T: serde::Serialize> Success<T> {
    pub fn ok(data: Option<T>) -> Self {
        Self {
            status: actix_web::http::StatusCode::OK,
            body: Some(SuccessBody::Json(SuccessData { data, message: None })),
            cookies: Vec::new(),
            location: None,
        }
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        if let Some(SuccessBody::Json(body)) = &mut self.body {
            body.message = Some(msg.into());
        }
        self
    }

    pub fn cookies(mut self, cookies: Vec<actix_web::cookie::Cookie<'static>>) -> Self {
        self.cookies = cookies;
        self
    }
}

impl Success<()> {
    pub fn page(html: String) -> Self {
        Self {
            status: actix_web::http::StatusCode::OK,
            body: Some(SuccessBody::Html(html)),
            cookies: Vec::new(),
            location: None,
        }
    }

    /// Redirect the browser to `location` with a GET
    pub fn see_other(location: impl Into<String>) -> Self {
        Self {
            status: actix_web::http::StatusCode::SEE_OTHER,
            body: None,
            cookies: Vec::new(),
            location: Some(location.into()),
        }
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        for cookie in self.cookies {
            response.cookie(cookie);
        }

        if let Some(location) = self.location {
            response.insert_header((header::LOCATION, location));
        }

        match self.body {
            Some(SuccessBody::Json(body)) => response.json(body),
            Some(SuccessBody::Html(html)) => {
                response.content_type(header::ContentType::html()).body(html)
            }
            None => response.finish(),
        }
    }
}
