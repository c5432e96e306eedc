use bpj_client::Journal;

pub struct AppState {
    pub journal: Journal,
}

impl AppState {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}
