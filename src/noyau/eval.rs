//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> check_brackets -> check_grammar -> imbriquer -> evaluer_arbre
//!
//! Une garde neuve est armée à chaque appel : deux appels (même concurrents)
//! ne partagent aucun état. Toute erreur est convertie en `StatusCode` ici,
//! rien ne panique hors du noyau.

use log::{debug, log_enabled, Level};

use super::config::Config;
use super::controle::{check_brackets, check_grammar};
use super::delai::Garde;
use super::erreur::{ErreurCalcul, StatusCode};
use super::imbrication::imbriquer;
use super::jetons::{format_tokens, tokenize};
use super::nombre::Nombre;
use super::rpn::evaluer_arbre;

/// Trace des étapes atteintes, pour l’affichage de la démarche.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Demarche {
    pub jetons: String,
    pub arbre: String,
    pub resultat: String,
    pub note: String,
}

/// API publique : calcule avec la configuration par défaut (délai 1 s, 28 chiffres).
pub fn calculate(expression: &str) -> (StatusCode, Option<Nombre>) {
    calculate_with(expression, &Config::default())
}

pub fn calculate_with(expression: &str, config: &Config) -> (StatusCode, Option<Nombre>) {
    match evaluer(expression, config) {
        Ok(v) => (StatusCode::Success, Some(v)),
        Err(e) => (e.status(), None),
    }
}

/// Forme `Result` de `calculate_with`.
pub fn evaluer(expression: &str, config: &Config) -> Result<Nombre, ErreurCalcul> {
    pipeline(expression, config, None)
}

/// Comme `calculate_with`, avec la démarche (jetons, arbre restructuré, résultat ou motif d’échec).
pub fn calculate_detaille(
    expression: &str,
    config: &Config,
) -> (StatusCode, Option<Nombre>, Demarche) {
    let mut d = Demarche {
        note: "Pipeline: jetons → parenthèses → grammaire → imbrication → RPN → valeur.".into(),
        ..Demarche::default()
    };

    match pipeline(expression, config, Some(&mut d)) {
        Ok(v) => {
            d.resultat = v.to_string();
            (StatusCode::Success, Some(v), d)
        }
        Err(e) => {
            let status = e.status();
            d.resultat = format!("{status}: {e}");
            (status, None, d)
        }
    }
}

fn pipeline(
    expression: &str,
    config: &Config,
    demarche: Option<&mut Demarche>,
) -> Result<Nombre, ErreurCalcul> {
    let mut garde = Garde::new(config);
    let resultat = etapes(expression, config, &mut garde, demarche);

    match &resultat {
        Ok(v) => debug!("résultat: {v} ({:?})", garde.ecoule()),
        Err(e) => debug!("échec: {e} ({:?})", garde.ecoule()),
    }
    resultat
}

fn etapes(
    expression: &str,
    config: &Config,
    garde: &mut Garde,
    mut demarche: Option<&mut Demarche>,
) -> Result<Nombre, ErreurCalcul> {
    // 1) Jetons
    let jetons = tokenize(expression, garde)?;
    if log_enabled!(Level::Debug) || demarche.is_some() {
        let txt = format_tokens(&jetons);
        debug!("jetons: {txt}");
        if let Some(d) = demarche.as_deref_mut() {
            d.jetons = txt;
        }
    }

    // 2) Validation
    check_brackets(&jetons, garde)?;
    check_grammar(&jetons, garde)?;

    // 3) Restructuration
    let (arbre, racine) = imbriquer(&jetons, config, garde)?;
    if let Some(d) = demarche {
        d.arbre = arbre.afficher(racine).to_string();
    }

    // 4) Valeur
    evaluer_arbre(&arbre, racine, config, garde)
}
