//! Site-wide error pages, registered through `ErrorHandlers` in `main`.

use actix_web::dev::ServiceResponse;
use actix_web::http::header::{self, HeaderValue};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::Result;

fn error_body(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><head><title>{title}</title></head><body>\
         <h1>{title}</h1>\
         <p>{message}</p>\
         <p><a href=\"/\">Back to the board</a></p>\
         </body></html>",
        title = title,
        message = message
    )
}

fn render<B>(res: ServiceResponse<B>, title: &str, message: &str) -> Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();

    let mut res = res.set_body(error_body(title, message));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}

pub fn render_400<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render(
        res,
        "400 Bad Request",
        "The request could not be understood. Check the form and try again.",
    )
}

pub fn render_404<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render(
        res,
        "404 Not Found",
        "The page you requested could not be found.",
    )
}

pub fn render_500<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render(
        res,
        "500 Internal Server Error",
        "Something went wrong on our side. Please try again later.",
    )
}
