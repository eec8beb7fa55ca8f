//! Noyau de calcul infixe
//!
//! Organisation interne :
//! - jetons.rs       : tokenisation (nombres exacts, opérateurs, fonctions, parenthèses)
//! - controle.rs     : validation des parenthèses et de la grammaire
//! - arbre.rs        : arène de nœuds (groupes indexés)
//! - imbrication.rs  : parenthèses, fonctions, puissances, moins unaires -> arbre
//! - rpn.rs          : shunting-yard + réduction RPN, groupe par groupe
//! - nombre.rs       : entier exact OU décimal, puissance sous garde
//! - decimal.rs      : décimal à précision fixe (28 chiffres, arrondi au pair)
//! - fonctions.rs    : sin cos tan cot ln log
//! - format.rs       : affichage des nombres
//! - delai.rs        : garde anti-gel (échéance par appel)
//! - erreur.rs       : ErreurCalcul + StatusCode
//! - config.rs       : réglages (délai, précision, profondeur)
//! - eval.rs         : pipeline complet

pub mod arbre;
pub mod config;
pub mod controle;
pub mod decimal;
pub mod delai;
pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod format;
pub mod imbrication;
pub mod jetons;
pub mod nombre;
pub mod rpn;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use config::Config;
pub use erreur::{ErreurCalcul, Raison, StatusCode};
pub use eval::{calculate, calculate_detaille, calculate_with, evaluer, Demarche};
pub use nombre::Nombre;
