//! API DTOs (Data Transfer Objects)

use serde::Serialize;

pub const STATUS_SUCCESS: &str = "Success";

/// Single record response
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data,
        }
    }
}

/// Record list response
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn success(data: Vec<T>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            count: data.len(),
            data,
        }
    }
}
