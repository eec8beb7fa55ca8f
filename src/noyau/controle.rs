// src/noyau/controle.rs
//
// Validation AVANT toute restructuration :
// - check_brackets : appariement ( ) { }, fonction suivie de sa parenthèse, pas de groupe vide
// - check_grammar  : alternance opérande / opérateur, niveau par niveau
//
// Aucune récursion native.

use log::info;

use super::delai::Garde;
use super::erreur::{ErreurCalcul, Raison};
use super::jetons::{Jeton, Parenthese};

fn rejet(raison: Raison) -> ErreurCalcul {
    info!("expression rejetée : {raison}");
    ErreurCalcul::Invalide(raison)
}

/// Vérifie la structure des parenthèses.
///
/// Passe 1 : pile des ouvrantes (une fermante doit être du même style que l’ouvrante au sommet).
/// Passe 2 : `f` suivie d’une ouvrante, et aucune paire vide `()` / `{}`.
pub fn check_brackets(tokens: &[Jeton], garde: &mut Garde) -> Result<(), ErreurCalcul> {
    let mut pile: Vec<Parenthese> = Vec::new();

    for t in tokens {
        garde.verifier()?;

        let Jeton::Parenthese(p) = t else {
            continue;
        };

        if p.est_ouvrante() {
            pile.push(*p);
            continue;
        }

        match pile.pop() {
            Some(ouvrante) if ouvrante.fermante() == *p => {}
            _ => return Err(rejet(Raison::OuverteAGauche)),
        }
    }

    if !pile.is_empty() {
        return Err(rejet(Raison::OuverteADroite));
    }

    for (k, t) in tokens.iter().enumerate() {
        garde.verifier()?;

        let suivant = tokens.get(k + 1);
        match t {
            Jeton::Fonction(f) => {
                if !matches!(suivant, Some(Jeton::Parenthese(p)) if p.est_ouvrante()) {
                    return Err(rejet(Raison::ParentheseAttendue(*f)));
                }
            }
            Jeton::Parenthese(p) if p.est_ouvrante() => {
                // la passe 1 garantit qu’un jeton suit
                if matches!(suivant, Some(Jeton::Parenthese(q)) if *q == p.fermante()) {
                    return Err(rejet(Raison::ParenthesesVides));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Vérifie l’alternance opérande / opérateur.
///
/// `operateur_attendu` est propre à chaque niveau. Une ouvrante n’est admise que là où
/// un opérande est attendu : l’état du niveau parent au moment de l’ouverture est donc
/// toujours `false`, et la fermante le remet à `true` (le groupe compte comme un opérande).
/// Pas besoin de pile : l’appariement a déjà été vérifié par [`check_brackets`].
pub fn check_grammar(tokens: &[Jeton], garde: &mut Garde) -> Result<(), ErreurCalcul> {
    if tokens.is_empty() {
        return Err(rejet(Raison::Vide));
    }

    let mut operateur_attendu = false;

    for t in tokens {
        garde.verifier()?;

        match t {
            Jeton::Parenthese(p) if p.est_ouvrante() => {
                // pas de multiplication implicite : "3(4)" est refusé
                if operateur_attendu {
                    return Err(rejet(Raison::OperateurAttendu));
                }
            }
            Jeton::Parenthese(_) => {
                if !operateur_attendu {
                    return Err(rejet(Raison::FinSurOperateur));
                }
                operateur_attendu = true;
            }
            Jeton::Operateur(op) => {
                if !operateur_attendu && !op.est_unaire() {
                    return Err(rejet(Raison::OperateurInattendu));
                }
                operateur_attendu = false;
            }
            Jeton::Nombre(_) | Jeton::Fonction(_) if operateur_attendu => {
                return Err(rejet(Raison::OperateurAttendu));
            }
            Jeton::Nombre(_) => operateur_attendu = true,
            // son groupe d’argument suit
            Jeton::Fonction(_) => {}
        }
    }

    if !operateur_attendu {
        return Err(rejet(Raison::FinSurOperateur));
    }

    Ok(())
}
