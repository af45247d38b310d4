use crate::geo::{CameraPosition, Coordinates};

/// One Brazilian federative unit with a hand-calibrated focus.
///
/// `name` matches the `name` property of the state boundary file, which is
/// what highlight matching compares against. Zoom is tuned so the state
/// fills the frame: large states sit around 2.2–3.5, small or dense ones
/// need 6–12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateInfo {
    pub name: &'static str,
    pub uf: &'static str,
    pub focus: Coordinates,
    pub zoom: f64,
}

impl StateInfo {
    pub const fn position(&self) -> CameraPosition {
        CameraPosition::new(self.focus, self.zoom)
    }
}

const fn state(name: &'static str, uf: &'static str, lon: f64, lat: f64, zoom: f64) -> StateInfo {
    StateInfo {
        name,
        uf,
        focus: [lon, lat],
        zoom,
    }
}

/// Focus zoom for a custom region given coordinates but no zoom.
pub const DEFAULT_FOCUS_ZOOM: f64 = 4.0;

pub const STATES: [StateInfo; 27] = [
    state("Acre", "AC", -70.5, -9.2, 5.0),
    state("Alagoas", "AL", -36.6, -9.6, 10.0),
    state("Amapá", "AP", -51.8, 1.4, 5.5),
    state("Amazonas", "AM", -64.6, -4.2, 2.2),
    state("Bahia", "BA", -41.7, -12.5, 3.0),
    state("Ceará", "CE", -39.5, -5.2, 5.5),
    state("Distrito Federal", "DF", -47.8, -15.8, 12.0),
    state("Espírito Santo", "ES", -40.6, -19.6, 8.0),
    state("Goiás", "GO", -49.6, -15.9, 3.5),
    state("Maranhão", "MA", -45.3, -5.0, 3.5),
    state("Mato Grosso", "MT", -55.9, -12.7, 2.5),
    state("Mato Grosso do Sul", "MS", -54.6, -20.5, 3.5),
    state("Minas Gerais", "MG", -44.6, -18.5, 3.0),
    state("Pará", "PA", -52.5, -4.0, 2.3),
    state("Paraíba", "PB", -36.8, -7.1, 9.0),
    state("Paraná", "PR", -51.6, -24.6, 4.5),
    state("Pernambuco", "PE", -37.9, -8.4, 7.0),
    state("Piauí", "PI", -42.9, -7.4, 3.5),
    state("Rio de Janeiro", "RJ", -42.7, -22.3, 8.0),
    state("Rio Grande do Norte", "RN", -36.5, -5.8, 9.0),
    state("Rio Grande do Sul", "RS", -53.2, -29.7, 3.5),
    state("Rondônia", "RO", -62.8, -10.9, 4.5),
    state("Roraima", "RR", -61.3, 2.1, 4.5),
    state("Santa Catarina", "SC", -50.5, -27.3, 6.0),
    state("São Paulo", "SP", -48.5, -22.2, 4.5),
    state("Sergipe", "SE", -37.4, -10.6, 12.0),
    state("Tocantins", "TO", -48.3, -10.2, 3.5),
];

/// Look a state up by exact name or UF code (case-insensitive).
pub fn lookup(key: &str) -> Option<&'static StateInfo> {
    let key = key.trim();
    STATES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(key) || s.uf.eq_ignore_ascii_case(key))
        .or_else(|| STATES.iter().find(|s| s.name.to_lowercase() == key.to_lowercase()))
}
