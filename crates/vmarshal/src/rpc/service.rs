// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Service singletons returned by `RetrieveServiceContent`.

use crate::error::Result;
use crate::value::{DataRecord, ManagedObjectRef};

/// Fixed service singletons, populated once per connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceContent {
    pub root_folder: ManagedObjectRef,
    pub property_collector: ManagedObjectRef,
    pub search_index: ManagedObjectRef,
    pub session_manager: Option<ManagedObjectRef>,
    /// `about.apiVersion`, used for revision negotiation.
    pub api_version: Option<String>,
    /// The full decoded record.
    pub raw: DataRecord,
}

impl ServiceContent {
    /// Extract the singletons from a decoded `ServiceContent` record.
    pub fn from_record(record: DataRecord) -> Result<Self> {
        let api_version = record
            .get("about")
            .and_then(|about| about.get("apiVersion"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(Self {
            root_folder: record.get_as("rootFolder")?,
            property_collector: record.get_as("propertyCollector")?,
            search_index: record.get_as("searchIndex")?,
            session_manager: record.get_opt("sessionManager")?,
            api_version,
            raw: record,
        })
    }
}
