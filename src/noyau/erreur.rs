// src/noyau/erreur.rs
//
// Taxonomie des échecs du noyau.
// - ErreurCalcul : seul type d’erreur, propagé par `?` d’une étape à l’autre
// - StatusCode   : code ordinal rendu par calculate() (valeurs figées)

use std::fmt;

use thiserror::Error;

use super::jetons::Fonction;

/// Code de retour de `calculate`.
///
/// Les ordinaux sont figés : des valeurs stockées dans des jeux de tests
/// en dépendent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    Success = 0,
    InvalidExpression = 1,
    ValueError = 2,
    ZeroDivisionError = 3,
    OverflowError = 4,
    TimeoutError = 5,
    MemoryError = 6,
}

impl StatusCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Success
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nom = match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::InvalidExpression => "INVALID_EXPRESSION",
            StatusCode::ValueError => "VALUE_ERROR",
            StatusCode::ZeroDivisionError => "ZERO_DIVISION_ERROR",
            StatusCode::OverflowError => "OVERFLOW_ERROR",
            StatusCode::TimeoutError => "TIMEOUT_ERROR",
            StatusCode::MemoryError => "MEMORY_ERROR",
        };
        f.write_str(nom)
    }
}

/// Pourquoi une expression est refusée (lexer ou validateurs).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Raison {
    #[error("entrée vide")]
    Vide,
    #[error("jeton non reconnu: '{0}'")]
    JetonInconnu(String),
    #[error("nombre invalide: '{0}'")]
    NombreInvalide(String),
    #[error("parenthèses non appariées (ouverte à gauche)")]
    OuverteAGauche,
    #[error("parenthèses non appariées (ouverte à droite)")]
    OuverteADroite,
    #[error("'(' attendue après {0}")]
    ParentheseAttendue(Fonction),
    #[error("parenthèses vides")]
    ParenthesesVides,
    #[error("opérateur attendu")]
    OperateurAttendu,
    #[error("opérateur inattendu")]
    OperateurInattendu,
    #[error("expression terminée par un opérateur")]
    FinSurOperateur,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    #[error("expression invalide: {0}")]
    Invalide(#[from] Raison),

    /// Argument hors du domaine d’une fonction (ln(-1), tan sur une asymptote…).
    #[error("{fonction}({argument}) hors domaine")]
    Domaine { fonction: Fonction, argument: String },

    #[error("division par zéro")]
    DivisionParZero,

    #[error("dépassement de capacité")]
    Depassement,

    #[error("délai d’évaluation dépassé")]
    DelaiDepasse,

    #[error("mémoire insuffisante (imbrication trop profonde)")]
    Memoire,
}

impl ErreurCalcul {
    pub fn status(&self) -> StatusCode {
        match self {
            ErreurCalcul::Invalide(_) => StatusCode::InvalidExpression,
            ErreurCalcul::Domaine { .. } => StatusCode::ValueError,
            ErreurCalcul::DivisionParZero => StatusCode::ZeroDivisionError,
            ErreurCalcul::Depassement => StatusCode::OverflowError,
            ErreurCalcul::DelaiDepasse => StatusCode::TimeoutError,
            ErreurCalcul::Memoire => StatusCode::MemoryError,
        }
    }
}
