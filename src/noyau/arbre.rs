// src/noyau/arbre.rs
//
// Arène de nœuds : les groupes référencent leurs enfants par indice.
// Ni Box ni récursion : parcours et affichage passent par une pile explicite.

use std::fmt;

use super::jetons::{Fonction, Operateur};
use super::nombre::Nombre;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoeudId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Noeud {
    Nombre(Nombre),
    Operateur(Operateur),
    Fonction(Fonction),
    /// Sous-expression (parenthèses, appel de fonction, puissance, moins replié).
    Groupe(Vec<NoeudId>),
}

impl Noeud {
    pub fn operateur(&self) -> Option<Operateur> {
        match self {
            Noeud::Operateur(op) => Some(*op),
            _ => None,
        }
    }

    pub fn est_groupe(&self) -> bool {
        matches!(self, Noeud::Groupe(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Arbre {
    noeuds: Vec<Noeud>,
}

impl Arbre {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ajouter(&mut self, noeud: Noeud) -> NoeudId {
        self.noeuds.push(noeud);
        NoeudId(self.noeuds.len() - 1)
    }

    /// Les identifiants ne sont produits que par `ajouter` : l’indice est toujours valide.
    pub fn noeud(&self, id: NoeudId) -> &Noeud {
        &self.noeuds[id.0]
    }

    /// Enfants d’un groupe ; vide pour une feuille.
    pub fn enfants(&self, id: NoeudId) -> &[NoeudId] {
        match self.noeud(id) {
            Noeud::Groupe(enfants) => enfants,
            _ => &[],
        }
    }

    pub fn remplacer_enfants(&mut self, id: NoeudId, enfants: Vec<NoeudId>) {
        if let Noeud::Groupe(actuels) = &mut self.noeuds[id.0] {
            *actuels = enfants;
        }
    }

    /// Instantané des groupes existants ; une étape de réécriture ne traite que ceux-là.
    pub fn groupes(&self) -> Vec<NoeudId> {
        self.noeuds
            .iter()
            .enumerate()
            .filter(|(_, n)| n.est_groupe())
            .map(|(k, _)| NoeudId(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.noeuds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.noeuds.is_empty()
    }

    /// Vue affichable d’un sous-arbre : `[-1 * [5 ^ 2]]`.
    pub fn afficher(&self, id: NoeudId) -> Affichage<'_> {
        Affichage { arbre: self, id }
    }
}

pub struct Affichage<'a> {
    arbre: &'a Arbre,
    id: NoeudId,
}

enum Tache {
    Noeud(NoeudId),
    Texte(&'static str),
}

impl fmt::Display for Affichage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pile = vec![Tache::Noeud(self.id)];

        while let Some(tache) = pile.pop() {
            let id = match tache {
                Tache::Texte(t) => {
                    f.write_str(t)?;
                    continue;
                }
                Tache::Noeud(id) => id,
            };

            match self.arbre.noeud(id) {
                Noeud::Nombre(n) => write!(f, "{n}")?,
                Noeud::Operateur(op) => write!(f, "{}", op.symbole())?,
                Noeud::Fonction(fct) => f.write_str(fct.nom())?,
                Noeud::Groupe(enfants) => {
                    f.write_str("[")?;
                    pile.push(Tache::Texte("]"));
                    for (k, enfant) in enfants.iter().enumerate().rev() {
                        pile.push(Tache::Noeud(*enfant));
                        if k > 0 {
                            pile.push(Tache::Texte(" "));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
