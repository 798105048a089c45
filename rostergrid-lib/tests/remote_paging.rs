//! Remote grids against a real paging server on localhost.

use std::net::SocketAddr;

use rostergrid_lib::grid::Commit;
use rostergrid_lib::grid::Document;
use rostergrid_lib::grid::Element;
use rostergrid_lib::grid::GridPage;
use rostergrid_lib::grid::LoadStatus;
use rostergrid_lib::grid::PageSetup;
use rostergrid_lib::grid::AJAX_URL_ATTR;
use rostergrid_lib::grid::FLAGGED_CLASS;
use rostergrid_lib::export::export_filter_from_url;
use rostergrid_lib::export::Navigation;
use rostergrid_lib::input::FilterInput;
use rostergrid_lib::model::CellValue;
use rostergrid_lib::model::ColumnSpec;
use rostergrid_lib::model::RowRecord;
use rostergrid_lib::protocol::Direction;
use rostergrid_lib::protocol::PageResponse;
use rostergrid_lib::protocol::SortOrder;
use rostergrid_lib::server::PagingServer;
use rostergrid_lib::server::TableService;
use tokio_util::sync::CancellationToken;
use url::Url;

const MAESTROS_PATH: &str = "/maestros/ajax/";

fn maestro(id: &str, name: &str, misplaced: bool) -> RowRecord {
    RowRecord::new(vec![
        CellValue::from(id),
        CellValue::from(name),
        CellValue::from("Primaria"),
        CellValue::from("Matutino"),
        CellValue::from("Zona 3"),
        CellValue::from("Activo"),
        CellValue::from(r#"<a href="/maestros/1/">Editar</a>"#),
        CellValue::from(misplaced),
    ])
}

fn maestros_service() -> TableService {
    let mut columns: Vec<ColumnSpec> = (0..6).map(ColumnSpec::new).collect();
    columns.push(ColumnSpec::action(6));
    columns.push(ColumnSpec::new(7).hidden());
    let rows = vec![
        maestro("M01", "JOSÉ ÁLVAREZ", false),
        maestro("M02", "MARÍA BELTRÁN", true),
        maestro("M03", "ANA CASTRO", false),
    ];
    TableService::from_rows(columns, rows).unwrap()
}

async fn start_server() -> (SocketAddr, CancellationToken) {
    let server = PagingServer::bind(([127, 0, 0, 1], 0).into(), maestros_service())
        .await
        .unwrap()
        .with_path(MAESTROS_PATH);
    let addr = server.local_addr().unwrap();
    let cancel = CancellationToken::new();
    tokio::spawn(server.serve(cancel.clone()));
    (addr, cancel)
}

fn roster_page(addr: SocketAddr) -> (Document, PageSetup) {
    let document = Document::new()
        .with(Element::new("tablaMaestros").with_data(AJAX_URL_ATTR, MAESTROS_PATH))
        .with(Element::new("export-excel-btn"));
    let origin = Url::parse(&format!("http://{}/", addr)).unwrap();
    (document, PageSetup::school_records(origin))
}

#[tokio::test]
async fn test_initial_load_renders_and_flags_rows() {
    let (addr, cancel) = start_server().await;
    let (document, setup) = roster_page(addr);
    let page = GridPage::init(&document, &setup);
    page.load().await;

    let grid = page.grid("tablaMaestros").unwrap();
    assert_eq!(grid.status(), LoadStatus::Ready);

    let view = grid.view();
    assert_eq!(view.records_total, 3);
    assert_eq!(view.rows.len(), 3);
    // Hidden flag column is not rendered.
    assert_eq!(view.rows[0].cells.len(), 7);
    assert!(!view.rows[0].has_class(FLAGGED_CLASS));
    assert!(view.rows[1].has_class(FLAGGED_CLASS));

    cancel.cancel();
}

#[tokio::test]
async fn test_typing_filters_on_the_server() {
    let (addr, cancel) = start_server().await;
    let (document, setup) = roster_page(addr);
    let page = GridPage::init(&document, &setup);
    page.load().await;

    let mut input = FilterInput::new("alvarez");
    page.on_filter_key_up("tablaMaestros", &mut input)
        .await
        .unwrap();
    assert_eq!(input.value(), "ALVAREZ");

    let view = page.grid("tablaMaestros").unwrap().view();
    assert_eq!(view.records_filtered, 1);
    assert_eq!(view.rows[0].cells[1], "JOSÉ ÁLVAREZ");

    let Some(Navigation::To(link)) = page.on_click("export-excel-btn") else {
        panic!("export button did not navigate");
    };
    assert_eq!(link, "/maestros/exportar/excel/?filtro=ALVAREZ");
    assert_eq!(export_filter_from_url(&link).as_deref(), Some("ALVAREZ"));

    cancel.cancel();
}

#[tokio::test]
async fn test_page_turns_and_sorting_go_to_the_server() {
    let (addr, cancel) = start_server().await;
    let (document, setup) = roster_page(addr);
    let page = GridPage::init(&document, &setup);
    page.load().await;

    let grid = page.grid("tablaMaestros").unwrap();
    let names = || -> Vec<String> {
        grid.view().rows.into_iter().map(|r| r.cells[1].clone()).collect()
    };
    grid.set_page_length(Some(2));

    assert_eq!(page.on_page("tablaMaestros", 1).await.unwrap(), Some(Commit::Applied));
    assert_eq!(grid.start(), 2);
    assert_eq!(grid.view().records_filtered, 3);
    assert_eq!(names(), vec!["ANA CASTRO"]);

    // Sorting returns to the first page.
    page.on_header_click("tablaMaestros", 1).await.unwrap();
    assert_eq!(grid.order(), Some(SortOrder::asc(1)));
    assert_eq!(grid.start(), 0);
    assert_eq!(names(), vec!["ANA CASTRO", "JOSÉ ÁLVAREZ"]);

    page.on_header_click("tablaMaestros", 1).await.unwrap();
    assert_eq!(names(), vec!["MARÍA BELTRÁN", "JOSÉ ÁLVAREZ"]);

    assert!(grid.order_by(0, Direction::Desc));
    assert_eq!(grid.refresh().await.unwrap(), Commit::Applied);
    let ids: Vec<String> = grid.view().rows.into_iter().map(|r| r.cells[0].clone()).collect();
    assert_eq!(ids, vec!["M03", "M02"]);

    // The action column cannot be sorted.
    assert_eq!(page.on_header_click("tablaMaestros", 6).await.unwrap(), None);

    cancel.cancel();
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_the_grid() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (document, setup) = roster_page(addr);
    let page = GridPage::init(&document, &setup);
    page.load().await;

    let grid = page.grid("tablaMaestros").unwrap();
    assert!(matches!(grid.status(), LoadStatus::Failed { draw: 1, .. }));
    assert!(grid.view().rows.is_empty());
    assert!(grid.processing_indicator().is_none());
}

#[tokio::test]
async fn test_server_rejects_bad_queries_and_methods() {
    let (addr, cancel) = start_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{}{}", addr, MAESTROS_PATH);

    let bad = client
        .get(format!("{}?start=abc", base))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);
    let body: serde_json::Value = bad.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("start"));

    let post = client.post(&base).send().await.unwrap();
    assert_eq!(post.status().as_u16(), 405);

    let elsewhere = client
        .get(format!("http://{}/otra/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(elsewhere.status().as_u16(), 404);

    let ok: PageResponse = client
        .get(format!("{}?draw=9&length=-1", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ok.draw, 9);
    assert_eq!(ok.len(), 3);

    cancel.cancel();
}
