// src/noyau/delai.rs
//
// Garde anti-gel : échéance coopérative, propre à UN appel de calculate().
// Chaque boucle du noyau appelle verifier(); l’horloge n’est lue qu’une fois
// toutes les `intervalle_verification` vérifications.

use std::time::{Duration, Instant};

use log::warn;

use super::config::Config;
use super::erreur::ErreurCalcul;

#[derive(Debug)]
pub struct Garde {
    debut: Instant,
    delai: Duration,
    compteur: u32,
    masque: u32,
}

impl Garde {
    /// Arme l’échéance maintenant.
    pub fn new(config: &Config) -> Self {
        let intervalle = config.intervalle_verification.max(1).next_power_of_two();
        Self {
            debut: Instant::now(),
            delai: config.delai,
            compteur: 0,
            masque: intervalle - 1,
        }
    }

    pub fn verifier(&mut self) -> Result<(), ErreurCalcul> {
        self.compteur = (self.compteur + 1) & self.masque;
        if self.compteur == 0 {
            return self.verifier_horloge();
        }
        Ok(())
    }

    /// Lit l’horloge à chaque appel : pour les boucles dont chaque tour est coûteux
    /// (multiplications de grands entiers).
    pub fn verifier_horloge(&self) -> Result<(), ErreurCalcul> {
        let ecoule = self.debut.elapsed();
        if ecoule > self.delai {
            warn!("calcul interrompu après {ecoule:?}");
            return Err(ErreurCalcul::DelaiDepasse);
        }
        Ok(())
    }

    pub fn ecoule(&self) -> Duration {
        self.debut.elapsed()
    }
}
