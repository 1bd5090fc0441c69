//! Listing records as published in the license list JSON files.

use serde::{Deserialize, Serialize};

/// One entry of `licenses.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub license_id: String,
    pub name: String,
    #[serde(default)]
    pub is_osi_approved: bool,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// One entry of `exceptions.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRecord {
    pub license_exception_id: String,
    pub name: String,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
    #[serde(default)]
    pub see_also: Vec<String>,
}

/// Top level of `licenses.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseList {
    pub license_list_version: String,
    pub licenses: Vec<LicenseRecord>,
}

/// Top level of `exceptions.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionList {
    pub license_list_version: String,
    pub exceptions: Vec<ExceptionRecord>,
}
