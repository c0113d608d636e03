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

use crate::error::FsError;
use crate::state::Entry;
use crate::FsResult;
use fxhash::{FxHashMap, FxHashSet};

/// One direction pair of id translation tables, built from `local:filer` pairs.
///
/// The configured pairs are completed into a permutation: a filer id that is
/// taken by a pair but not itself mapped goes back to the local id freed by the
/// chain of pairs ending at it. This keeps `to_local(to_filer(x)) == x` for every x.
#[derive(Debug, Clone, Default)]
pub struct IdMapper {
    to_filer: FxHashMap<u32, u32>,
    to_local: FxHashMap<u32, u32>,
}

impl IdMapper {
    pub fn new(pairs: &[(u32, u32)]) -> FsResult<Self> {
        let mut to_filer = FxHashMap::default();
        let mut to_local = FxHashMap::default();

        for &(local, filer) in pairs {
            if to_filer.insert(local, filer).is_some() {
                return Err(FsError::invalid_argument(format!(
                    "local id {} is mapped twice",
                    local
                )));
            }
            if to_local.insert(filer, local).is_some() {
                return Err(FsError::invalid_argument(format!(
                    "filer id {} is mapped twice",
                    filer
                )));
            }
        }

        let locals: FxHashSet<u32> = to_filer.keys().copied().collect();
        let filers: FxHashSet<u32> = to_local.keys().copied().collect();

        for &taken in filers.difference(&locals) {
            let mut freed = taken;
            loop {
                freed = to_local[&freed];
                if !filers.contains(&freed) {
                    break;
                }
            }
            to_filer.insert(taken, freed);
        }

        let to_local = to_filer.iter().map(|(k, v)| (*v, *k)).collect();
        Ok(Self { to_filer, to_local })
    }

    /// Parses `local:filer,local:filer`. An empty string gives the identity mapping.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> FsResult<Self> {
        let mut pairs = vec![];
        for item in s.split(',').map(|x| x.trim()).filter(|x| !x.is_empty()) {
            let (local, filer) = match item.split_once(':') {
                Some(v) => v,
                None => {
                    return Err(FsError::invalid_argument(format!(
                        "id map item {} is not local:filer",
                        item
                    )))
                }
            };
            pairs.push((Self::parse_id(local)?, Self::parse_id(filer)?));
        }

        Self::new(&pairs)
    }

    fn parse_id(s: &str) -> FsResult<u32> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| FsError::invalid_argument(format!("invalid id {}", s)))
    }

    pub fn is_empty(&self) -> bool {
        self.to_filer.is_empty()
    }

    pub fn to_filer(&self, local: u32) -> u32 {
        self.to_filer.get(&local).copied().unwrap_or(local)
    }

    pub fn to_local(&self, filer: u32) -> u32 {
        self.to_local.get(&filer).copied().unwrap_or(filer)
    }
}

/// Translates the owner and group of entries between the id space of this host
/// and the id space of the filer.
#[derive(Debug, Clone, Default)]
pub struct UidGidMapper {
    uid: IdMapper,
    gid: IdMapper,
}

impl UidGidMapper {
    pub fn new(uid_map: &str, gid_map: &str) -> FsResult<Self> {
        Ok(Self {
            uid: IdMapper::from_str(uid_map)?,
            gid: IdMapper::from_str(gid_map)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.uid.is_empty() && self.gid.is_empty()
    }

    pub fn map_to_filer(&self, entry: &mut Entry) {
        let attr = &mut entry.attributes;
        attr.uid = self.uid.to_filer(attr.uid);
        attr.gid = self.gid.to_filer(attr.gid);
    }

    pub fn map_to_local(&self, entry: &mut Entry) {
        let attr = &mut entry.attributes;
        attr.uid = self.uid.to_local(attr.uid);
        attr.gid = self.gid.to_local(attr.gid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(mapper: &IdMapper, ids: impl IntoIterator<Item = u32>) {
        for id in ids {
            assert_eq!(mapper.to_local(mapper.to_filer(id)), id, "id {}", id);
            assert_eq!(mapper.to_filer(mapper.to_local(id)), id, "id {}", id);
        }
    }

    #[test]
    fn parse() {
        let mapper = IdMapper::from_str("1000:2000, 0:5").unwrap();
        assert_eq!(mapper.to_filer(1000), 2000);
        assert_eq!(mapper.to_filer(0), 5);
        assert_eq!(mapper.to_local(2000), 1000);
        assert_eq!(mapper.to_filer(42), 42);

        assert!(IdMapper::from_str("").unwrap().is_empty());
        assert!(IdMapper::from_str("1000").is_err());
        assert!(IdMapper::from_str("a:1").is_err());
        assert!(IdMapper::from_str("1:2,1:3").is_err());
        assert!(IdMapper::from_str("1:3,2:3").is_err());
    }

    #[test]
    fn completed_into_permutation() {
        // 2000 is taken on the filer side, so local 2000 must go somewhere free.
        let mapper = IdMapper::from_str("1000:2000").unwrap();
        assert_eq!(mapper.to_filer(2000), 1000);
        round_trip(&mapper, [0, 1, 999, 1000, 2000, u32::MAX]);

        // Chain 1 -> 2 -> 3: local 3 is the only id left to take filer 1.
        let mapper = IdMapper::from_str("1:2,2:3").unwrap();
        assert_eq!(mapper.to_filer(3), 1);
        round_trip(&mapper, 0..10);

        let mapper = IdMapper::from_str("0:1000,1000:0,7:7").unwrap();
        round_trip(&mapper, [0, 7, 1000, 65534]);
    }

    #[test]
    fn entry_round_trip() {
        let mapper = UidGidMapper::new("0:1000,1000:0", "500:0").unwrap();
        for (uid, gid) in [(0, 0), (1000, 1000), (0, 500), (u32::MAX, 1)] {
            let mut entry = Entry::default_file("a.txt");
            entry.attributes.uid = uid;
            entry.attributes.gid = gid;
            let origin = entry.clone();

            mapper.map_to_filer(&mut entry);
            mapper.map_to_local(&mut entry);
            assert_eq!(entry, origin);
        }

        let mut entry = Entry::default_file("a.txt");
        entry.attributes.uid = 0;
        entry.attributes.gid = 500;
        mapper.map_to_filer(&mut entry);
        assert_eq!(entry.attributes.uid, 1000);
        assert_eq!(entry.attributes.gid, 0);
    }
}
