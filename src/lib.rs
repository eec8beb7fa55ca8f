//! Calculatrice infixe : `calculate("3+4*2")` -> `(StatusCode::Success, Some(11))`.
//!
//! Entiers exacts, décimaux à 28 chiffres significatifs, fonctions sin cos tan cot ln log,
//! délai d’évaluation borné. Voir [`noyau`] pour les étapes.

pub mod noyau;

pub use noyau::{
    calculate, calculate_detaille, calculate_with, evaluer, Config, Demarche, ErreurCalcul,
    Nombre, Raison, StatusCode,
};
