use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use prot_domain::{Clinic, Expense, PatientDraft, PaymentStatus, ServiceItem, WorkflowStatus};
use prot_workflow::LabService;

/// Pequeno menu interativo para administrar o laboratório usando o
/// repositório fornecido por `prot-persistence`.
///
/// Opções suportadas:
/// 1) Ver ordens de serviço (tabela com id, paciente e etapa)
/// 2) Cadastrar paciente
/// 3) Avançar etapa de uma ordem
/// 4) Registrar pagamento
/// 5) Excluir ordem
/// 6) Registrar despesa
/// 7) Importar planilha CSV legada
/// 8) Ver painel
/// 9) Cadastrar clínica parceira
/// 10) Cadastrar serviço no catálogo
/// 11) Sair
fn main() -> Result<(), Box<dyn Error>> {
    // Inicializar repo (aplica migrações embutidas se necessário)
    let repo = Arc::new(prot_persistence::new_from_env().map_err(|e| Box::new(e) as Box<dyn Error>)?);
    let service = LabService::new(repo)?;

    if service.test_connectivity() {
        println!("[backend remoto conectado]");
    } else {
        println!("[armazenamento local]");
    }

    loop {
        println!("\n== Menu do laboratório ==");
        println!("1) Ver ordens de serviço");
        println!("2) Cadastrar paciente");
        println!("3) Avançar etapa de uma ordem");
        println!("4) Registrar pagamento");
        println!("5) Excluir ordem");
        println!("6) Registrar despesa");
        println!("7) Importar planilha CSV");
        println!("8) Ver painel");
        println!("9) Cadastrar clínica parceira");
        println!("10) Cadastrar serviço no catálogo");
        println!("11) Sair");
        print!("Escolha uma opção: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                match service.state() {
                    Ok(state) => {
                        println!("\nID                                   | PACIENTE             | ETAPA                | PAGAMENTO");
                        println!("--------------------------------------------------------------------------------------------");
                        for p in state.patients_by_entry_date() {
                            println!("{:<36} | {:<20} | {:<20} | {}",
                                     p.id(),
                                     p.name(),
                                     p.current_status().label(),
                                     p.payment_status().label());
                        }
                    }
                    Err(e) => eprintln!("Erro listando ordens: {}", e),
                }
            }
            "2" => {
                let name = prompt("Nome do paciente: ")?;
                let clinic = prompt("Clínica: ")?;
                let doctor_name = prompt("Dentista: ")?;
                let doctor_phone = prompt("Telefone do dentista (enter para vazio): ")?;
                let prosthesis_type = prompt("Tipo de prótese: ")?;
                let suggested = service.suggested_price(prosthesis_type.trim()).unwrap_or(None);
                if let Some(price) = suggested {
                    println!("Preço de catálogo para '{}': R$ {:.2}", prosthesis_type.trim(), price);
                }
                let value_s = prompt("Valor do serviço (enter para usar o catálogo/0): ")?;
                let service_value = value_s.trim().replace(',', ".").parse::<f64>().ok().or(suggested).unwrap_or(0.0);
                let labor_s = prompt("Custo de bancada (enter para 0): ")?;
                let labor_cost = labor_s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0);
                let notes = prompt("Observações (enter para vazio): ")?;
                let draft = PatientDraft { name: name.trim().to_string(),
                                           clinic: clinic.trim().to_string(),
                                           doctor_name: doctor_name.trim().to_string(),
                                           doctor_phone: doctor_phone.trim().to_string(),
                                           prosthesis_type: prosthesis_type.trim().to_string(),
                                           notes: notes.trim().to_string(),
                                           service_value,
                                           labor_cost,
                                           entry_date: None,
                                           due_date: None };
                match service.create_patient(draft) {
                    Ok(p) => println!("Ordem criada: {}", p.id()),
                    Err(e) => eprintln!("Erro criando ordem: {}", e),
                }
            }
            "3" => {
                let id = prompt("Id da ordem: ")?;
                println!("Etapas:");
                for (i, status) in WorkflowStatus::ALL.iter().enumerate() {
                    println!("  {}) {}", i + 1, status.label());
                }
                let idx_s = prompt("Nova etapa (número): ")?;
                let status = match idx_s.trim().parse::<usize>().ok().and_then(|i| WorkflowStatus::ALL.get(i.wrapping_sub(1))) {
                    Some(s) => *s,
                    None => { eprintln!("Etapa inválida"); continue; }
                };
                let notes = prompt("Observações do lançamento (enter para vazio): ")?;
                match service.advance_status(id.trim(), status, notes.trim()) {
                    Ok(p) => println!("Ordem {} agora em: {}", p.id(), p.current_status().label()),
                    Err(e) => eprintln!("Erro avançando etapa: {}", e),
                }
            }
            "4" => {
                let id = prompt("Id da ordem: ")?;
                let paid = prompt("Marcar como pago? (s/n): ")?;
                let status = if paid.trim().eq_ignore_ascii_case("s") { PaymentStatus::Pago } else { PaymentStatus::Pendente };
                match service.set_payment_status(id.trim(), status) {
                    Ok(p) => println!("Pagamento de {}: {}", p.name(), p.payment_status().label()),
                    Err(e) => eprintln!("Erro registrando pagamento: {}", e),
                }
            }
            "5" => {
                let id = prompt("Id da ordem a excluir: ")?;
                let confirm = prompt(&format!("Confirma exclusão de {}? escrever 'sim' para confirmar: ", id.trim()))?;
                if confirm.trim().to_lowercase() == "sim" {
                    match service.delete_patient(id.trim()) {
                        Ok(()) => println!("Ordem excluída: {}", id.trim()),
                        Err(e) => eprintln!("Erro excluindo ordem: {}", e),
                    }
                } else {
                    println!("Exclusão cancelada");
                }
            }
            "6" => {
                let description = prompt("Descrição da despesa: ")?;
                let amount_s = prompt("Valor: ")?;
                let amount = amount_s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0);
                let category = prompt("Categoria (material, fixo, equipamento...): ")?;
                match Expense::new(description.trim(), amount, chrono::Utc::now(), category.trim()) {
                    Ok(expense) => match service.register_expense(expense) {
                        Ok(id) => println!("Despesa registrada: {}", id),
                        Err(e) => eprintln!("Erro registrando despesa: {}", e),
                    },
                    Err(e) => eprintln!("Despesa inválida: {}", e),
                }
            }
            "7" => {
                let path = prompt("Caminho do arquivo CSV: ")?;
                match std::fs::read_to_string(path.trim()) {
                    Ok(raw) => match service.import_csv(&raw) {
                        Ok(summary) => println!("Importadas {} linhas ({} puladas)", summary.imported, summary.skipped),
                        Err(e) => eprintln!("Erro importando planilha: {}", e),
                    },
                    Err(e) => eprintln!("Erro lendo arquivo: {}", e),
                }
            }
            "8" => {
                match service.dashboard() {
                    Ok(report) => {
                        let s = &report.summary;
                        println!("\n== Painel ({}) ==", report.monthly.year());
                        println!("Ordens ativas:      {}", s.active_count);
                        println!("Em produção:        {}", s.production_count);
                        println!("Em retrabalho:      {}", s.rework_count);
                        println!("Finalizadas:        {}", s.completed_count);
                        println!("Receita total:      R$ {:.2}", s.total_revenue);
                        println!("Despesas totais:    R$ {:.2}", s.total_expenses);
                        println!("Lucro líquido:      R$ {:.2}", s.net_profit);
                        println!("\nMês | Receita      | Despesas");
                        for m in 0..12 {
                            println!("{:>3} | R$ {:>9.2} | R$ {:>9.2}",
                                     m + 1,
                                     report.monthly.revenue()[m],
                                     report.monthly.expenses()[m]);
                        }
                        println!("\nDistribuição por etapa:");
                        for (status, count) in &report.status_distribution {
                            println!("  {:<20} {}", status.label(), count);
                        }
                    }
                    Err(e) => eprintln!("Erro montando painel: {}", e),
                }
            }
            "9" => {
                let name = prompt("Nome da clínica: ")?;
                let doctor = prompt("Dentista responsável: ")?;
                let phone = prompt("Telefone (enter para vazio): ")?;
                let phone_opt = if phone.trim().is_empty() { None } else { Some(phone.trim().to_string()) };
                match Clinic::new(name.trim(), doctor.trim(), phone_opt) {
                    Ok(clinic) => match service.register_clinic(clinic) {
                        Ok(id) => println!("Clínica cadastrada: {}", id),
                        Err(e) => eprintln!("Erro cadastrando clínica: {}", e),
                    },
                    Err(e) => eprintln!("Clínica inválida: {}", e),
                }
            }
            "10" => {
                let name = prompt("Nome do serviço: ")?;
                let price_s = prompt("Preço: ")?;
                let price = price_s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0);
                match ServiceItem::new(name.trim(), price) {
                    Ok(item) => match service.register_service_item(item) {
                        Ok(id) => println!("Serviço cadastrado: {}", id),
                        Err(e) => eprintln!("Erro cadastrando serviço: {}", e),
                    },
                    Err(e) => eprintln!("Serviço inválido: {}", e),
                }
            }
            "11" => {
                println!("Saindo...");
                break;
            }
            other => {
                println!("Opção inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
