use rp_mirror::{DocumentForwarder, SchemaMirror};

pub struct ApiRestCtx {
    mirror: SchemaMirror,
    forwarder: DocumentForwarder,
}

impl ApiRestCtx {
    pub fn new(mirror: SchemaMirror, forwarder: DocumentForwarder) -> Self {
        Self { mirror, forwarder }
    }

    pub fn mirror(&self) -> &SchemaMirror {
        &self.mirror
    }

    pub fn forwarder(&self) -> &DocumentForwarder {
        &self.forwarder
    }
}
