// workflow_status.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Etapas de produção de uma prótese, na ordem em que a bancada as
/// executa. `RemontarDentes` é a etapa de retrabalho (a ordem volta à
/// produção ativa); `Finalizado` é a única etapa terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
  PlanoCera,
  MoldeiraIndividual,
  Barra,
  Armacao,
  MontagemDentes,
  Acrilizar,
  RemontarDentes,
  Finalizado,
}

impl WorkflowStatus {
  /// Todas as etapas, na ordem de produção. O retrabalho aparece antes do
  /// estado terminal porque devolve a ordem à produção ativa.
  pub const ALL: [WorkflowStatus; 8] = [WorkflowStatus::PlanoCera,
                                        WorkflowStatus::MoldeiraIndividual,
                                        WorkflowStatus::Barra,
                                        WorkflowStatus::Armacao,
                                        WorkflowStatus::MontagemDentes,
                                        WorkflowStatus::Acrilizar,
                                        WorkflowStatus::RemontarDentes,
                                        WorkflowStatus::Finalizado];

  /// `true` somente para `Finalizado`.
  pub fn is_terminal(&self) -> bool {
    matches!(self, WorkflowStatus::Finalizado)
  }

  /// `true` somente para `RemontarDentes`.
  pub fn is_rework(&self) -> bool {
    matches!(self, WorkflowStatus::RemontarDentes)
  }

  /// Rótulo humano da etapa. Match exaustivo: adicionar uma etapa nova
  /// obriga a decidir o rótulo aqui.
  pub fn label(&self) -> &'static str {
    match self {
      WorkflowStatus::PlanoCera => "Plano de cera",
      WorkflowStatus::MoldeiraIndividual => "Moldeira individual",
      WorkflowStatus::Barra => "Barra",
      WorkflowStatus::Armacao => "Armação",
      WorkflowStatus::MontagemDentes => "Montagem de dentes",
      WorkflowStatus::Acrilizar => "Acrilizar",
      WorkflowStatus::RemontarDentes => "Remontar dentes",
      WorkflowStatus::Finalizado => "Finalizado",
    }
  }

  /// Forma canônica gravada em disco (mesma usada pelo serde).
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkflowStatus::PlanoCera => "plano_cera",
      WorkflowStatus::MoldeiraIndividual => "moldeira_individual",
      WorkflowStatus::Barra => "barra",
      WorkflowStatus::Armacao => "armacao",
      WorkflowStatus::MontagemDentes => "montagem_dentes",
      WorkflowStatus::Acrilizar => "acrilizar",
      WorkflowStatus::RemontarDentes => "remontar_dentes",
      WorkflowStatus::Finalizado => "finalizado",
    }
  }
}

impl fmt::Display for WorkflowStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label())
  }
}

impl FromStr for WorkflowStatus {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "plano_cera" => Ok(WorkflowStatus::PlanoCera),
      "moldeira_individual" => Ok(WorkflowStatus::MoldeiraIndividual),
      "barra" => Ok(WorkflowStatus::Barra),
      "armacao" => Ok(WorkflowStatus::Armacao),
      "montagem_dentes" => Ok(WorkflowStatus::MontagemDentes),
      "acrilizar" => Ok(WorkflowStatus::Acrilizar),
      "remontar_dentes" => Ok(WorkflowStatus::RemontarDentes),
      "finalizado" => Ok(WorkflowStatus::Finalizado),
      _ => Err(()),
    }
  }
}

/// Situação de pagamento da ordem de serviço. Independente da etapa de
/// produção: uma ordem finalizada pode seguir pendente e vice-versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Pendente,
  Pago,
}

impl PaymentStatus {
  pub fn label(&self) -> &'static str {
    match self {
      PaymentStatus::Pendente => "Pendente",
      PaymentStatus::Pago => "Pago",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentStatus::Pendente => "pendente",
      PaymentStatus::Pago => "pago",
    }
  }
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.label())
  }
}

impl FromStr for PaymentStatus {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "pendente" => Ok(PaymentStatus::Pendente),
      "pago" => Ok(PaymentStatus::Pago),
      _ => Err(()),
    }
  }
}

impl Default for PaymentStatus {
  fn default() -> Self {
    PaymentStatus::Pendente
  }
}
