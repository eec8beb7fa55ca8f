// src/noyau/config.rs
//
// Paramètres d’un calcul (passés par référence, jamais globaux).

use std::time::Duration;

/// Délai par défaut (usage interactif).
const DELAI_DEFAUT: Duration = Duration::from_secs(1);

/// Lecture de l’horloge une fois toutes les N vérifications (puissance de 2).
const INTERVALLE_DEFAUT: u32 = 1024;

/// Chiffres significatifs des décimaux.
const PRECISION_DEFAUT: u32 = 28;

/// Exposant ajusté maximal d’un décimal avant dépassement.
const EXPOSANT_MAX_DEFAUT: i64 = 999_999;

/// Garde-fou : profondeur d’imbrication (parenthèses, puissances, fonctions).
const PROFONDEUR_MAX_DEFAUT: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub delai: Duration,
    pub intervalle_verification: u32,
    pub precision: u32,
    pub exposant_max: i64,
    pub profondeur_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delai: DELAI_DEFAUT,
            intervalle_verification: INTERVALLE_DEFAUT,
            precision: PRECISION_DEFAUT,
            exposant_max: EXPOSANT_MAX_DEFAUT,
            profondeur_max: PROFONDEUR_MAX_DEFAUT,
        }
    }
}

impl Config {
    pub fn with_delai(mut self, delai: Duration) -> Self {
        self.delai = delai;
        self
    }

    /// Arrondi à la puissance de 2 supérieure (le compteur est masqué).
    pub fn with_intervalle_verification(mut self, n: u32) -> Self {
        self.intervalle_verification = n.max(1).next_power_of_two();
        self
    }

    pub fn with_precision(mut self, chiffres: u32) -> Self {
        self.precision = chiffres.max(1);
        self
    }

    pub fn with_exposant_max(mut self, e: i64) -> Self {
        self.exposant_max = e.max(1);
        self
    }

    pub fn with_profondeur_max(mut self, p: usize) -> Self {
        self.profondeur_max = p.max(1);
        self
    }
}
