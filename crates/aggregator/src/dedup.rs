use nexus_protocol::{ActivityStub, TaggedManifest};
use std::collections::HashMap;

/// Insertion-ordered set of activity stubs keyed by relative path.
///
/// A colliding insert replaces the stored stub entirely (last write wins)
/// but keeps the position of the first insertion. That position fixes the
/// activity ordering of the combined topic document, so it must survive
/// overwrites.
#[derive(Debug, Default)]
pub struct StubSet {
    index: HashMap<String, usize>,
    entries: Vec<ActivityStub>,
}

impl StubSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stub: ActivityStub) {
        match self.index.get(&stub.path) {
            Some(&position) => self.entries[position] = stub,
            None => {
                self.index.insert(stub.path.clone(), self.entries.len());
                self.entries.push(stub);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityStub> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ActivityStub> {
        self.entries
    }
}

/// Merge the activity lists of all manifests, in processing order, tagging
/// each stub with its owning application on the way in.
pub fn merge_activities(manifests: &[TaggedManifest]) -> StubSet {
    let mut stubs = StubSet::new();
    for tagged in manifests {
        for stub in &tagged.manifest.activities {
            let mut stub = stub.clone();
            stub.app_name = Some(tagged.app_name.clone());
            stub.app_git_url = Some(tagged.app_git_url.clone());
            stubs.insert(stub);
        }
    }
    stubs
}
