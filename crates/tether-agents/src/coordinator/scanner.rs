// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Detection and firing of satisfied requests.

use tether_data::DependencyStore;

/// Fires every request that is satisfied, returning how many fired.
///
/// The set of requests is snapshotted first, so each one is visited once per
/// pass. A fired request is removed from the store before its callback runs.
pub(crate) fn scan(store: &mut DependencyStore) -> usize {
    let mut fired = 0;
    for id in store.requests().ids() {
        if let Some((callback, resolved)) = store.take_satisfied(&id) {
            log::debug!(
                "Request {id} satisfied with {} value(s)",
                resolved.len()
            );
            callback(resolved);
            fired += 1;
        }
    }
    fired
}
