//! Upload acknowledgement
//!
//! Accepts the request and reports a generated filename. The body is not
//! read and nothing is stored.

use newsroom_sdk::prelude::*;

use crate::content::ids::now_millis;

pub fn handle(upload_type: Option<&str>, req: &Request) -> Result<Response, HandlerError> {
    if !req.is_method("POST") {
        return Err(HandlerError::MethodNotAllowed);
    }

    let upload_type = upload_type.unwrap_or("file");
    Ok(Response::ok(json!({
        "success": true,
        "message": format!(
            "Upload endpoint for {} received. For production use, implement proper file handling.",
            upload_type
        ),
        "filename": format!("uploaded_{}", now_millis()),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_acknowledged() {
        let req = Request::new("POST", "/api/upload/image").with_body("binary junk");
        let response = handle(Some("image"), &req).unwrap();
        assert_eq!(response.status, 200);

        let body = response.json_body().unwrap();
        assert_eq!(body["success"], json!(true));
        assert!(body["message"].as_str().unwrap().contains("image"));
        let filename = body["filename"].as_str().unwrap();
        assert!(filename.starts_with("uploaded_"));
        assert!(filename["uploaded_".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_upload_requires_post() {
        let err = handle(Some("image"), &Request::new("GET", "/api/upload/image")).unwrap_err();
        assert_eq!(err.status_code(), 405);
    }
}
