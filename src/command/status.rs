// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status request command.

use crate::command::Command;
use crate::topic::Endpoint;

/// Asks the device to republish its full status.
///
/// Shared by every model; it also refreshes energy counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusRequest;

impl Command for StatusRequest {
    fn topic(&self, endpoint: &Endpoint) -> String {
        endpoint.command()
    }

    fn payload(&self) -> String {
        "update".to_string()
    }
}
