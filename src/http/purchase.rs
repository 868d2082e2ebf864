use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};

use crate::app_system::AppError;
use crate::http::{CurrentUser, SharedState};

pub async fn buy(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    state.fulfillment.purchase(&user, id).await?;
    Ok(Redirect::to(&format!("/project/{id}")))
}

pub async fn download(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let download = state.fulfillment.download(&user, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", header_safe(&download.file_name));
    Ok((
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        download.contents,
    )
        .into_response())
}

/// Header values must be visible ASCII; quotes would end the filename early.
fn header_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe() {
        assert_eq!(header_safe("Library System.zip"), "Library System.zip");
        assert_eq!(header_safe("Say \"hi\".zip"), "Say _hi_.zip");
        assert_eq!(header_safe("Café.zip"), "Caf_.zip");
    }
}
