/// quick start - a loan through its whole happy path
use nft_lending_rs::chrono::{TimeZone, Utc};
use nft_lending_rs::{
    CollateralAsset, Currency, InMemoryCustody, LendingEngine, LoanTerms, Money, Rate,
    SafeTimeProvider, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));

    let admin = Uuid::new_v4();
    let operator = Uuid::new_v4();
    let custodian = Uuid::new_v4();
    let borrower = Uuid::new_v4();
    let lender = Uuid::new_v4();

    // seed the ledger: the borrower owns an nft, the lender has cash
    let nft = CollateralAsset {
        contract: Uuid::new_v4(),
        token_id: 42,
    };
    let mut custody = InMemoryCustody::new();
    custody.register_asset(nft, borrower);
    custody.deposit(Currency::Native, lender, Money::from_units(5_000));
    custody.deposit(Currency::Native, borrower, Money::from_units(5_000));

    let mut engine = LendingEngine::new(custody, admin, operator, custodian);

    // list a 450-unit loan against a 1000-unit nft, five weekly installments
    let terms = LoanTerms {
        loan_amount: Money::from_units(450),
        assets_value: Money::from_units(1000),
        interest_rate: Rate::from_scaled(50),
        installment_frequency: 7,
        nr_of_installments: 5,
        currency: Currency::Native,
    };
    let loan_id = engine.create_loan(&borrower, terms, vec![nft], &time)?;
    println!("created loan {loan_id}: {:?}", engine.status(loan_id)?);

    // fund it with exactly the principal
    engine.approve_loan(&lender, loan_id, Money::from_units(450), &time)?;
    println!("funded: {:?}", engine.status(loan_id)?);

    // repay everything in two lump sums, then reclaim the nft
    engine.pay_loan(&borrower, loan_id, Money::from_units(200), &time)?;
    engine.pay_loan(&borrower, loan_id, Money::from_units(300), &time)?;
    engine.withdraw_items(&borrower, loan_id, &time)?;
    println!("released: {:?}", engine.status(loan_id)?);

    for event in engine.take_events() {
        println!("{event:?}");
    }
    println!("{}", engine.registry().to_json()?);

    Ok(())
}
