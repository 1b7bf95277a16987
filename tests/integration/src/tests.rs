//! Integration tests for the daypot lottery and its randomness oracle.
//!
//! Both contracts run on their own `cosmwasm_std::testing` mocks. Messages
//! one contract emits for the other are routed by hand, with the sender set
//! to the emitting contract, the way the chain would deliver them.
//!
//! Run:
//! ```bash
//! cargo test -p daypot-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, Binary, CosmosMsg, Env, OwnedDeps, Reply, Response,
    SubMsgResponse, SubMsgResult, Timestamp, Uint128, Uint256, WasmMsg,
};
use daypot_common::{DrawStatus, DrawTarget};
use daypot_lottery::contract as lottery;
use daypot_lottery::error::ContractError as LotteryError;
use daypot_lottery::guard::TRANSFER_REPLY_ID;
use daypot_lottery::msg::{
    DayPotResponse, ExecuteMsg as LotteryMsg, InstantiateMsg as LotteryInit,
    QueryMsg as LotteryQuery, SolvencyResponse,
};
use daypot_randomness_oracle::contract as oracle;
use daypot_randomness_oracle::error::ContractError as OracleError;
use daypot_randomness_oracle::msg::{
    ExecuteMsg as OracleMsg, InstantiateMsg as OracleInit, QueryMsg as OracleQuery,
};
use daypot_randomness_oracle::state::RandomnessRequest;

// ─── Constants ───

const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
const QUICKNET_CHAIN_HASH: &str = "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";
const QUICKNET_GENESIS: u64 = 1692803367;

/// Real quicknet round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const DENOM: &str = "inj";
const CENT: u128 = 10_000_000_000_000_000;
const DAY: u64 = 86_400;
/// Draws are triggered at this time so that `TEST_ROUND` is the next beacon
const DRAW_TIME: u64 = QUICKNET_GENESIS + 2_994;
/// Tickets are sold the day before the draw
const TODAY: u64 = DRAW_TIME / DAY - 1;

type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

// ─── Harness ───

struct Chain {
    api: MockApi,
    lottery: MockDeps,
    oracle: MockDeps,
    lottery_addr: Addr,
    oracle_addr: Addr,
    time: Timestamp,
    /// Funds held by the lottery, following every transfer in and out
    held: Uint128,
}

impl Chain {
    fn new() -> Self {
        let api = MockApi::default();
        let lottery_addr = api.addr_make("lottery");
        let oracle_addr = api.addr_make("oracle");

        let mut chain = Chain {
            api,
            lottery: mock_dependencies(),
            oracle: mock_dependencies(),
            lottery_addr,
            oracle_addr,
            time: Timestamp::from_seconds(TODAY * DAY + 3_600),
            held: Uint128::zero(),
        };

        let deployer = chain.addr("deployer");
        let operator = chain.addr("operator");
        let admin = chain.addr("admin");
        let manager = chain.addr("manager");
        let project = chain.addr("project");

        let env = chain.env_for(&chain.oracle_addr);
        oracle::instantiate(
            chain.oracle.as_mut(),
            env,
            message_info(&deployer, &[]),
            OracleInit {
                operators: vec![operator.to_string()],
                consumers: vec![chain.lottery_addr.to_string()],
                quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
                chain_hash: QUICKNET_CHAIN_HASH.to_string(),
                genesis_time: QUICKNET_GENESIS,
                period_seconds: 3,
            },
        )
        .unwrap();

        let env = chain.env_for(&chain.lottery_addr);
        lottery::instantiate(
            chain.lottery.as_mut(),
            env,
            message_info(&deployer, &[]),
            LotteryInit {
                admin: admin.to_string(),
                manager: manager.to_string(),
                project: project.to_string(),
                randomness_oracle: chain.oracle_addr.to_string(),
                denom: DENOM.to_string(),
                admin_share_pct: 40,
                cooldown_seconds: 3_600,
                rerequest_delay_seconds: 600,
            },
        )
        .unwrap();

        chain
    }

    fn addr(&self, name: &str) -> Addr {
        self.api.addr_make(name)
    }

    fn env_for(&self, contract: &Addr) -> Env {
        let mut env = mock_env();
        env.block.time = self.time;
        env.contract.address = contract.clone();
        env
    }

    fn advance(&mut self, seconds: u64) {
        self.time = self.time.plus_seconds(seconds);
    }

    fn set_time(&mut self, seconds: u64) {
        self.time = Timestamp::from_seconds(seconds);
    }

    fn sync_bank(&mut self) {
        let lottery_addr = self.lottery_addr.to_string();
        self.lottery
            .querier
            .bank.update_balance(lottery_addr, coins(self.held.u128(), DENOM));
    }

    fn execute_lottery(
        &mut self,
        sender: &Addr,
        amount: u128,
        msg: LotteryMsg,
    ) -> Result<Response, LotteryError> {
        let funds = if amount == 0 { vec![] } else { coins(amount, DENOM) };
        let env = self.env_for(&self.lottery_addr);
        let res = lottery::execute(self.lottery.as_mut(), env, message_info(sender, &funds), msg)?;
        self.held += Uint128::new(amount);
        self.sync_bank();
        Ok(res)
    }

    fn buy(&mut self, buyer: &str, quantity: u32, price: u128) {
        let buyer = self.addr(buyer);
        self.execute_lottery(&buyer, price, LotteryMsg::BuyTickets { quantity })
            .unwrap();
    }

    /// Deliver the lottery's randomness request to the oracle.
    fn forward_request(&mut self, res: &Response) -> u64 {
        let msg = wasm_payload(res, &self.oracle_addr);
        let OracleMsg::RequestRandomness { request_id, .. } = from_json::<OracleMsg>(&msg).unwrap()
        else {
            panic!("lottery sent an unexpected oracle message");
        };

        let env = self.env_for(&self.oracle_addr);
        let sender = self.lottery_addr.clone();
        oracle::execute(
            self.oracle.as_mut(),
            env,
            message_info(&sender, &[]),
            from_json(&msg).unwrap(),
        )
        .unwrap();
        request_id
    }

    fn fulfill(&mut self, request_id: u64) -> Result<Response, OracleError> {
        let operator = self.addr("operator");
        let env = self.env_for(&self.oracle_addr);
        oracle::execute(
            self.oracle.as_mut(),
            env,
            message_info(&operator, &[]),
            OracleMsg::FulfillRandomness {
                consumer: self.lottery_addr.to_string(),
                request_id,
                round: TEST_ROUND,
                signature_hex: TEST_SIG_HEX.to_string(),
            },
        )
    }

    /// Deliver the oracle's callback to the lottery.
    fn deliver_callback(&mut self, res: &Response) -> Result<Response, LotteryError> {
        let msg = wasm_payload(res, &self.lottery_addr);
        let sender = self.oracle_addr.clone();
        self.execute_lottery(&sender, 0, from_json(&msg).unwrap())
    }

    fn draw(&mut self, target: DrawTarget) -> Response {
        let keeper = self.addr("keeper");
        let res = self
            .execute_lottery(&keeper, 0, LotteryMsg::TriggerDraw { target })
            .unwrap();
        let request_id = self.forward_request(&res);
        let fulfilled = self.fulfill(request_id).unwrap();
        self.deliver_callback(&fulfilled).unwrap()
    }

    /// Withdraw for `who`, execute the bank transfer and acknowledge it.
    fn withdraw(&mut self, who: &str) -> Uint128 {
        let who = self.addr(who);
        let res = self
            .execute_lottery(&who, 0, LotteryMsg::Withdraw {})
            .unwrap();
        assert_eq!(res.messages[0].id, TRANSFER_REPLY_ID);
        let paid = match &res.messages[0].msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, &who.to_string());
                amount[0].amount
            }
            other => panic!("unexpected message: {:?}", other),
        };
        self.held -= paid;
        self.sync_bank();

        let env = self.env_for(&self.lottery_addr);
        lottery::reply(self.lottery.as_mut(), env, transfer_reply(transfer_ok())).unwrap();
        paid
    }

    fn pending(&self, who: &str) -> Uint128 {
        let env = self.env_for(&self.lottery_addr);
        let res = lottery::query(
            self.lottery.as_ref(),
            env,
            LotteryQuery::PendingPayment {
                address: self.addr(who).to_string(),
            },
        )
        .unwrap();
        from_json(res).unwrap()
    }

    fn solvency(&self) -> SolvencyResponse {
        let env = self.env_for(&self.lottery_addr);
        let res = lottery::query(self.lottery.as_ref(), env, LotteryQuery::Solvency {}).unwrap();
        from_json(res).unwrap()
    }

    fn assert_solvent(&self) {
        let solvency = self.solvency();
        assert_eq!(solvency.held, self.held);
        assert_eq!(solvency.liabilities, self.held);
        assert_eq!(solvency.surplus, Uint128::zero());
    }
}

fn wasm_payload(res: &Response, to: &Addr) -> Binary {
    res.messages
        .iter()
        .find_map(|sub| match &sub.msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            }) if contract_addr == to.as_str() => Some(msg.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no message addressed to {}", to))
}

fn transfer_reply(result: SubMsgResult) -> Reply {
    Reply {
        id: TRANSFER_REPLY_ID,
        payload: Binary::default(),
        gas_used: 0,
        result,
    }
}

#[allow(deprecated)]
fn transfer_ok() -> SubMsgResult {
    SubMsgResult::Ok(SubMsgResponse {
        events: vec![],
        data: None,
        msg_responses: vec![],
    })
}

/// The winning ticket index the round-1000 beacon yields for `total` tickets.
fn beacon_ticket(total: u64) -> u64 {
    let randomness: [u8; 32] = hex::decode(TEST_RANDOMNESS_HEX)
        .unwrap()
        .try_into()
        .unwrap();
    let ticket = Uint256::from_be_bytes(randomness) % Uint256::from(total);
    ticket.to_string().parse().unwrap()
}

// ─── Tests ───

#[test]
fn test_daily_draw_end_to_end() {
    let mut chain = Chain::new();

    chain.buy("alice", 1, CENT);
    chain.buy("bob", 5, 48 * CENT / 10);
    chain.buy("carol", 20, 18 * CENT);
    chain.assert_solvent();

    chain.set_time(DRAW_TIME);
    let res = chain.draw(DrawTarget::Day(TODAY));

    let expected_winner = match beacon_ticket(26) {
        0 => "alice",
        1..=5 => "bob",
        _ => "carol",
    };
    let winner = chain.addr(expected_winner);
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "winner" && a.value == winner.to_string()));

    assert_eq!(chain.pending("project"), Uint128::new(119 * CENT / 10));
    assert_eq!(chain.pending("admin"), Uint128::new(952 * CENT / 100));
    assert_eq!(chain.pending(expected_winner), Uint128::new(238 * CENT / 100));
    chain.assert_solvent();

    let env = chain.env_for(&chain.lottery_addr);
    let res = lottery::query(chain.lottery.as_ref(), env, LotteryQuery::DayPot { day: TODAY }).unwrap();
    let pot: DayPotResponse = from_json(res).unwrap();
    assert!(pot.drawn);
    assert_eq!(pot.winner, Some(winner));

    let env = chain.env_for(&chain.oracle_addr);
    let res = oracle::query(
        chain.oracle.as_ref(),
        env,
        OracleQuery::Request {
            consumer: chain.lottery_addr.to_string(),
            request_id: 1,
        },
    )
    .unwrap();
    let request: Option<RandomnessRequest> = from_json(res).unwrap();
    assert_eq!(request.unwrap().fulfilled_round, Some(TEST_ROUND));

    // Everyone pulls; the contract ends up empty
    let mut paid = Uint128::zero();
    for who in ["project", "admin", expected_winner] {
        paid += chain.withdraw(who);
        chain.assert_solvent();
    }
    assert_eq!(paid, Uint128::new(238 * CENT / 10));
    assert_eq!(chain.held, Uint128::zero());
}

#[test]
fn test_oracle_replay_is_rejected() {
    let mut chain = Chain::new();
    chain.buy("alice", 5, 48 * CENT / 10);
    chain.set_time(DRAW_TIME);

    let keeper = chain.addr("keeper");
    let res = chain
        .execute_lottery(
            &keeper,
            0,
            LotteryMsg::TriggerDraw {
                target: DrawTarget::Day(TODAY),
            },
        )
        .unwrap();
    let request_id = chain.forward_request(&res);
    let fulfilled = chain.fulfill(request_id).unwrap();
    chain.deliver_callback(&fulfilled).unwrap();

    // Same callback delivered twice
    let err = chain.deliver_callback(&fulfilled).unwrap_err();
    assert!(matches!(err, LotteryError::InvalidRequest { .. }));

    let err = chain.fulfill(request_id).unwrap_err();
    assert!(matches!(err, OracleError::AlreadyFulfilled { .. }));

    assert_eq!(chain.pending("alice"), Uint128::new(48 * CENT / 100));
    chain.assert_solvent();
}

#[test]
fn test_rerequest_after_silent_oracle() {
    let mut chain = Chain::new();
    chain.buy("alice", 1, CENT);
    chain.buy("bob", 1, CENT);
    chain.set_time(DRAW_TIME - 600);

    let keeper = chain.addr("keeper");
    let target = DrawTarget::Day(TODAY);
    let res = chain
        .execute_lottery(&keeper, 0, LotteryMsg::TriggerDraw { target })
        .unwrap();
    let stale_id = chain.forward_request(&res);

    chain.advance(600);
    let res = chain
        .execute_lottery(&keeper, 0, LotteryMsg::RerequestDraw { target })
        .unwrap();
    let fresh_id = chain.forward_request(&res);
    assert_ne!(stale_id, fresh_id);

    // The stale request was pinned to an older round than the beacon on hand
    let err = chain.fulfill(stale_id).unwrap_err();
    assert!(matches!(
        err,
        OracleError::RoundMismatch {
            round: TEST_ROUND,
            target_round: 800
        }
    ));

    // A callback for the superseded request is refused by the lottery
    let oracle = chain.oracle_addr.clone();
    let err = chain
        .execute_lottery(
            &oracle,
            0,
            LotteryMsg::ResolveDraw {
                request_id: stale_id,
                random_value: Uint256::from(7u64),
            },
        )
        .unwrap_err();
    assert!(matches!(err, LotteryError::InvalidRequest { .. }));

    let fulfilled = chain.fulfill(fresh_id).unwrap();
    chain.deliver_callback(&fulfilled).unwrap();

    let winner = if beacon_ticket(2) == 0 { "alice" } else { "bob" };
    assert_eq!(chain.pending(winner), Uint128::new(2 * CENT / 10));
    chain.assert_solvent();
}

#[test]
fn test_pool_draw_end_to_end() {
    let mut chain = Chain::new();
    let admin = chain.addr("admin");

    let res = chain
        .execute_lottery(
            &admin,
            0,
            LotteryMsg::CreatePool {
                ticket_price: Uint128::new(5 * CENT),
                active: true,
            },
        )
        .unwrap();
    let pool_id: u64 = res
        .attributes
        .iter()
        .find(|a| a.key == "pool_id")
        .unwrap()
        .value
        .parse()
        .unwrap();

    for (buyer, quantity) in [("alice", 4u32), ("bob", 2), ("carol", 1)] {
        let buyer = chain.addr(buyer);
        chain
            .execute_lottery(
                &buyer,
                5 * CENT * u128::from(quantity),
                LotteryMsg::BuyPoolTickets { pool_id, quantity },
            )
            .unwrap();
    }
    chain
        .execute_lottery(&admin, 65 * CENT, LotteryMsg::AddLiquidity { pool_id })
        .unwrap();

    // Alice gives up all her tickets; bob and carol remain in the draw
    let alice = chain.addr("alice");
    chain
        .execute_lottery(
            &alice,
            0,
            LotteryMsg::RedeemPoolTickets {
                pool_id,
                quantity: 4,
            },
        )
        .unwrap();
    chain.assert_solvent();

    chain.set_time(DRAW_TIME);
    chain.draw(DrawTarget::Pool(pool_id));

    let winner = if beacon_ticket(3) < 2 { "bob" } else { "carol" };
    // Pot 1.00: 0.50 project, 0.40 admin, 0.10 winner
    assert_eq!(chain.pending("project"), Uint128::new(50 * CENT));
    assert_eq!(chain.pending("admin"), Uint128::new(40 * CENT));
    assert_eq!(chain.pending(winner), Uint128::new(10 * CENT));
    assert_eq!(chain.pending("alice"), Uint128::zero());

    let env = chain.env_for(&chain.lottery_addr);
    let res = lottery::query(chain.lottery.as_ref(), env, LotteryQuery::Pool { pool_id }).unwrap();
    let pool: daypot_lottery::state::Pool = from_json(res).unwrap();
    assert_eq!(pool.draw.status, DrawStatus::Settled);
    assert_eq!(pool.balance, Uint128::zero());

    chain.withdraw(winner);
    chain.assert_solvent();
}
