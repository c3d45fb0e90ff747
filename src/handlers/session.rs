use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::session::{Role, Session};

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub operator: String,
    pub role: Role,
    pub can_manage_catalog: bool,
}

/// GET /session
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Operator signed in at this terminal", body = SessionResponse)),
    tag = "session"
)]
pub async fn get_session(session: web::Data<Session>) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        operator: session.operator.clone(),
        role: session.role,
        can_manage_catalog: session.can_manage_catalog(),
    })
}
