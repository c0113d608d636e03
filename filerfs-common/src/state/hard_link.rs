// Copyright 2025 OPPO.
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

use rand::RngCore;

// Trailing byte of every hardlink id. Other kinds of ids stored in the same
// entry field end with a different marker.
pub const HARD_LINK_MARKER: u8 = 0x01;

pub const HARD_LINK_ID_RANDOM_LEN: usize = 16;

pub const HARD_LINK_ID_LEN: usize = HARD_LINK_ID_RANDOM_LEN + 1;

pub struct HardLinkId;

impl HardLinkId {
    pub fn generate() -> Vec<u8> {
        let mut id = vec![0u8; HARD_LINK_ID_LEN];
        rand::thread_rng().fill_bytes(&mut id[..HARD_LINK_ID_RANDOM_LEN]);
        id[HARD_LINK_ID_RANDOM_LEN] = HARD_LINK_MARKER;
        id
    }

    pub fn is_hard_link_id(id: &[u8]) -> bool {
        id.len() == HARD_LINK_ID_LEN && id[HARD_LINK_ID_RANDOM_LEN] == HARD_LINK_MARKER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate() {
        let a = HardLinkId::generate();
        let b = HardLinkId::generate();
        assert_eq!(a.len(), 17);
        assert_eq!(a[16], HARD_LINK_MARKER);
        assert!(HardLinkId::is_hard_link_id(&a));
        assert_ne!(a, b);

        assert!(!HardLinkId::is_hard_link_id(&a[..16]));
        assert!(!HardLinkId::is_hard_link_id(&[]));
    }
}
