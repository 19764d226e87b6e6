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

//! Where the bytes of a resource come from.

mod filesystem;
mod memory;

pub use filesystem::FileSystemSource;
pub use memory::MemorySource;

use crate::error::FetchError;

/// Fetches the raw bytes stored at a resolved location.
///
/// Implementations may block; lanes are run on the coordinator's executor.
pub trait ByteSource: Send + Sync {
    /// Returns the bytes at `location`.
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}
