/// Event number
pub const EVENT: &str = "event";
/// Reconstructed momentum x component
pub const RECO_PX: &str = "reco_px";
/// Reconstructed momentum y component
pub const RECO_PY: &str = "reco_py";
/// Reconstructed momentum z component
pub const RECO_PZ: &str = "reco_pz";
/// Reconstructed energy
pub const RECO_E: &str = "reco_e";
/// Reconstructed charge
pub const RECO_CHARGE: &str = "reco_charge";
/// Generated momentum x component
pub const MC_PX: &str = "mc_px";
/// Generated momentum y component
pub const MC_PY: &str = "mc_py";
/// Generated momentum z component
pub const MC_PZ: &str = "mc_pz";
/// Generated energy
pub const MC_E: &str = "mc_e";
/// Generated charge
pub const MC_CHARGE: &str = "mc_charge";
/// Generator status of generated particles
pub const MC_GENERATOR_STATUS: &str = "mc_generator_status";
/// Association table, reconstructed side
pub const ASSOC_RECO_INDEX: &str = "assoc_reco_index";
/// Association table, generated side
pub const ASSOC_MC_INDEX: &str = "assoc_mc_index";
/// Muon positions within the reconstructed collection
pub const MUON_INDEX: &str = "muon_index";

/// Float32 list columns of the reconstructed collection
pub const RECO_FLOAT_COLUMNS: [&str; 5] = [RECO_PX, RECO_PY, RECO_PZ, RECO_E, RECO_CHARGE];
/// Float32 list columns of the generated collection
pub const MC_FLOAT_COLUMNS: [&str; 5] = [MC_PX, MC_PY, MC_PZ, MC_E, MC_CHARGE];
/// Int32 list columns
pub const INDEX_COLUMNS: [&str; 4] = [
    MC_GENERATOR_STATUS,
    ASSOC_RECO_INDEX,
    ASSOC_MC_INDEX,
    MUON_INDEX,
];
