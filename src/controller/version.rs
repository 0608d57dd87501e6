use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::error::Error;

#[get("/version")]
pub async fn index() -> Result<impl Responder, Error> {
    Ok(web::Json(Response {
        name: env!("CARGO_PKG_NAME"),
        version: option_env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub struct Response<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_response_shape() {
        let json = serde_json::to_value(Response {
            name: "yapperps",
            version: Some("0.3.0"),
        })
        .unwrap();
        assert_eq!(json["name"], "yapperps");
        assert_eq!(json["version"], "0.3.0");
    }
}
