//! Shared fixtures for the router tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Local, NaiveDate};
use inventory_dashboards::{
    config::{Config, SnapshotEncoding},
    create_app,
    loader::SnapshotReader,
    services::{RawSnapshots, Snapshots},
    AppState,
};
use tower::ServiceExt;

pub const SUPPLIERS: &str = "\
Item Produto;Fornecedor Atual;
12345.0;11222333000144;ACME ALIMENTOS
54321;22333444000155;BETA BEBIDAS
777;99;
";

pub const STOCK_LEDGER: &str = "\
MERC;DESCRICAO;EMBALAGEM;DIAS S/VND;IDADE;ESTOQ EMB1;ESTOQ EMB9;NAO VENDE (RUPT.);DT ULT ENT;QTD ULT ENT;DT ULT VND;GRUPO
0012345;ARROZ 5KG;UN;10;120;5;1;4;2024-04-01;12;2024-05-01;MERCEARIA
0054321;CERVEJA LATA;CX;1;30;0;2;;2024-04-02;24;2024-05-02;BEBIDAS
0011111;FEIJAO 1KG;UN;7;60;9;0;7;;6;2024-05-03;MERCEARIA
0022222;REFRIGERANTE;UN;2;15;3;1;2;2024-04-05;10;2024-05-04;BEBIDAS
";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn loss_events() -> String {
    let today = br_date(today());
    format!(
        "\
EVENTO;MERCADORIA;DESCRICAO;OPERACAO;GRUPO;SUB-GRUPO;VLR.TOTAL;EMB1;DT.ULT.EV.
6004;1;RF PRESUNTO;AJUSTE;FRIOS;EMBUTIDOS/FRIOS;-10,50;2;{today}
6504;3;HF ALFACE;AJUSTE;HORTI;FOLHAS;-4;1;{today}
1500;5;HF TOMATE;AVARIAS / HORTIFRUT;HORTI;LEGUMES;-2,50;4;{today}
6521;6;HF BATATA;NEGATIVO;HORTI;LEGUMES;-7;2;30/04/2024
6501;7;RF QUEIJO;ESTORNO;FRIOS;QUEIJOS;3;1;30/04/2024
"
    )
}

pub fn expiry_list() -> String {
    let day = |offset: i64| br_date(today() + Duration::days(offset));
    format!(
        "\
CÓDIGO;DESCRIÇÃO MERCADORIA;COMPLEMENTO;EMBALAGEM;DATA VENCIMENTO;EST. LÍQ. EMB1;EST. LÍQ. EMB9;VALOR VENCIMENTO
12345;ARROZ 5KG;LOTE A;UN;{};5;1;1.234,50
12345;ARROZ 5KG;LOTE B;UN;{};2;0;20,00
54321;CERVEJA LATA;;CX;{};10;1;300
11111;FEIJAO 1KG;;UN;{};1;0;50
",
        day(10),
        day(0),
        day(90),
        day(-3)
    )
}

pub fn raw_snapshots() -> RawSnapshots {
    let reader = SnapshotReader::new(';', SnapshotEncoding::Utf8);
    RawSnapshots {
        supplier: reader.read_bytes(SUPPLIERS.as_bytes()).unwrap(),
        stock_ledger: reader.read_bytes(STOCK_LEDGER.as_bytes()).unwrap(),
        loss_events: reader.read_bytes(loss_events().as_bytes()).unwrap(),
        expiry: reader.read_bytes(expiry_list().as_bytes()).unwrap(),
    }
}

/// Config whose snapshot paths do not exist, so a reload yields empty tables
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.data.supplier_path = "/nonexistent/Forn.csv".to_string();
    config.data.stock_ledger_path = "/nonexistent/smg12.csv".to_string();
    config.data.loss_events_path = "/nonexistent/perdas.csv".to_string();
    config.data.expiry_path = "/nonexistent/vencimento.csv".to_string();
    config
}

pub fn app() -> Router {
    create_app(AppState::new(test_config(), Snapshots::build(&raw_snapshots())))
}

pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    send(app, Method::GET, uri).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}
