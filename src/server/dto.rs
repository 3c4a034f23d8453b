use serde::{Deserialize, Serialize};

use crate::types::{Role, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveTripRequest {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveTripResponse {
    pub trip_id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteTripResponse {
    pub success: bool,
    pub deleted_trip_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Public view of an account. The password hash stays server-side.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub lat: f64,
    pub lon: f64,
}
