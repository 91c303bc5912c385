use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::SolCall;
use futures::future::join_all;
use serde_json::{json, Value};

use sd_abi::units::{format_units, NATIVE_DECIMALS};
use sd_abi::{ICrowdsale, ISaleToken};

use crate::error::{ClientError, ProviderError};
use crate::provider::Provider;

/// One address's standing against the sale: contributed native currency,
/// token balance and whitelist flag. Derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub address: Address,
    /// Contributed native currency, whole units, exact decimal string.
    pub native: String,
    /// Token balance, whole units, exact decimal string.
    pub tokens: String,
    pub whitelisted: bool,
}

impl BalanceSnapshot {
    /// The zeroed snapshot reported while no contract address is set.
    pub fn empty(address: Address) -> Self {
        Self {
            address,
            native: "0".to_owned(),
            tokens: "0".to_owned(),
            whitelisted: false,
        }
    }
}

/// One row of the bulk balance report. A failed per-address fetch is kept
/// so the report still carries one entry per listed address.
#[derive(Debug)]
pub struct ReportEntry {
    pub address: Address,
    pub snapshot: Result<BalanceSnapshot, ClientError>,
}

/// All remote operations against one crowdsale contract.
///
/// Cheap to construct; the page builds a fresh one per action from the
/// session's current contract address.
pub struct CrowdsaleClient<'a, P: Provider> {
    provider: &'a P,
    sale: Option<Address>,
}

impl<'a, P: Provider> CrowdsaleClient<'a, P> {
    pub fn new(provider: &'a P, sale: Option<Address>) -> Self {
        Self { provider, sale }
    }

    fn sale(&self) -> Result<Address, ClientError> {
        self.sale.ok_or(ClientError::NoContract)
    }

    async fn read<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, ClientError> {
        let params = json!([{ "to": to.to_string(), "data": hex_data(&call.abi_encode()) }, "latest"]);
        let result = self.provider.request("eth_call", params).await?;
        let raw = bytes_from_result(&result)?;
        C::abi_decode_returns_validate(&raw).map_err(|e| ClientError::Abi(e.to_string()))
    }

    async fn send<C: SolCall>(
        &self,
        from: Address,
        value: Option<U256>,
        call: C,
    ) -> Result<String, ClientError> {
        let to = self.sale()?;
        let mut tx = json!({
            "from": from.to_string(),
            "to": to.to_string(),
            "data": hex_data(&call.abi_encode()),
        });
        if let Some(value) = value {
            tx["value"] = Value::String(format!("{value:#x}"));
        }
        let result = self.provider.request("eth_sendTransaction", json!([tx])).await?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::Malformed("transaction hash is not a string".into()).into())
    }

    // ── Balance aggregation ──

    /// Consolidated standing of one address.
    ///
    /// Without a contract address this is the zeroed default and no remote
    /// call is made. Otherwise: contributor record on the sale, then the
    /// token contract address, then the token balance.
    pub async fn balance_snapshot(&self, address: Address) -> Result<BalanceSnapshot, ClientError> {
        let Some(sale) = self.sale else {
            return Ok(BalanceSnapshot::empty(address));
        };
        let contributor = self
            .read(sale, ICrowdsale::contributorsCall { account: address })
            .await?;
        let token = self.read(sale, ICrowdsale::tokenCall {}).await?;
        let balance = self
            .read(token, ISaleToken::balanceOfCall { account: address })
            .await?;
        Ok(BalanceSnapshot {
            address,
            native: format_units(contributor.weiAmount, NATIVE_DECIMALS),
            tokens: format_units(balance, NATIVE_DECIMALS),
            whitelisted: contributor.whitelisted,
        })
    }

    // ── State-changing actions ──

    /// `buyTokens(beneficiary)` with `value` attached, sent from `from`.
    pub async fn buy_tokens(
        &self,
        from: Address,
        beneficiary: Address,
        value: U256,
    ) -> Result<String, ClientError> {
        self.send(from, Some(value), ICrowdsale::buyTokensCall { beneficiary })
            .await
    }

    pub async fn whitelist_address(
        &self,
        from: Address,
        account: Address,
    ) -> Result<String, ClientError> {
        self.send(from, None, ICrowdsale::whitelistAddressCall { account })
            .await
    }

    pub async fn refund_tokens(&self, from: Address) -> Result<String, ClientError> {
        self.send(from, None, ICrowdsale::refundTokensCall {}).await
    }

    pub async fn refund_tokens_for_address(
        &self,
        from: Address,
        account: Address,
    ) -> Result<String, ClientError> {
        self.send(from, None, ICrowdsale::refundTokensForAddressCall { account })
            .await
    }

    pub async fn transfer_token_ownership(
        &self,
        from: Address,
        new_owner: Address,
    ) -> Result<String, ClientError> {
        self.send(
            from,
            None,
            ICrowdsale::transferTokenOwnershipCall { newOwner: new_owner },
        )
        .await
    }

    // ── Address enumeration ──

    pub async fn addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.read(self.sale()?, ICrowdsale::getAddressesCall {}).await
    }

    /// Fetch every participant's snapshot concurrently and join before
    /// returning, one entry per listed address in listing order.
    pub async fn balance_report(&self) -> Result<Vec<ReportEntry>, ClientError> {
        let addresses = self.addresses().await?;
        let snapshots = join_all(
            addresses
                .iter()
                .map(|address| self.balance_snapshot(*address)),
        )
        .await;
        Ok(addresses
            .into_iter()
            .zip(snapshots)
            .map(|(address, snapshot)| ReportEntry { address, snapshot })
            .collect())
    }

    // ── Sale configuration reads (each independent, no cross-field atomicity) ──

    pub async fn tokens_sold(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::tokensSoldCall {}).await
    }

    pub async fn token_address(&self) -> Result<Address, ClientError> {
        self.read(self.sale()?, ICrowdsale::tokenCall {}).await
    }

    pub async fn buy_price(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::buyPriceCall {}).await
    }

    pub async fn softcap(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::softcapCall {}).await
    }

    pub async fn hardcap(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::hardcapCall {}).await
    }

    pub async fn sale_status(&self) -> Result<String, ClientError> {
        self.read(self.sale()?, ICrowdsale::crowdSaleStatusCall {}).await
    }

    /// Sale deadline as a unix timestamp; zero means not configured.
    pub async fn deadline(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::ICOdeadLineCall {}).await
    }

    pub async fn wei_delivered(&self) -> Result<U256, ClientError> {
        self.read(self.sale()?, ICrowdsale::weiDeliveredCall {}).await
    }
}

fn hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn bytes_from_result(result: &Value) -> Result<Vec<u8>, ProviderError> {
    let raw = result
        .as_str()
        .ok_or_else(|| ProviderError::Malformed("call result is not a string".into()))?;
    hex::decode(raw).map_err(|e| ProviderError::Malformed(format!("call result is not hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolValue;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct MockProvider {
        requests: RefCell<Vec<(String, Value)>>,
        responses: RefCell<VecDeque<Result<Value, ProviderError>>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(VecDeque::new()),
            }
        }

        fn push_return<T: SolValue>(&self, value: T) {
            self.push(Ok(Value::String(hex_data(&value.abi_encode()))));
        }

        fn push(&self, response: Result<Value, ProviderError>) {
            self.responses.borrow_mut().push_back(response);
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        fn recorded(&self, index: usize) -> (String, Value) {
            self.requests.borrow()[index].clone()
        }
    }

    #[async_trait(?Send)]
    impl Provider for MockProvider {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            self.requests.borrow_mut().push((method.to_owned(), params));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Value::Null))
        }
    }

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn wei(n: u128) -> U256 {
        U256::from(n)
    }

    fn tx_data(params: &Value) -> String {
        params[0]["data"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn empty_contract_address_yields_default_without_rpc() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        let client = CrowdsaleClient::new(&provider, None);

        let snapshot = client.balance_snapshot(addr(0xaa)).await?;

        assert_eq!(snapshot, BalanceSnapshot::empty(addr(0xaa)));
        assert_eq!(provider.request_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn balance_snapshot_divides_by_the_unit_factor_exactly() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.push_return((wei(2_000_000_000_000_000_000), true));
        provider.push_return(addr(0x07));
        provider.push_return(wei(1_500_000_000_000_000_000));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        let snapshot = client.balance_snapshot(addr(0xaa)).await?;

        assert_eq!(snapshot.native, "2");
        assert_eq!(snapshot.tokens, "1.5");
        assert!(snapshot.whitelisted);
        // contributor and token reads hit the sale, the balance read hits
        // the token contract returned by `token()`.
        assert_eq!(provider.request_count(), 3);
        let (_, params) = provider.recorded(2);
        assert_eq!(params[0]["to"], addr(0x07).to_string());
        Ok(())
    }

    #[tokio::test]
    async fn buy_attaches_value_and_sender() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.push(Ok(Value::String("0xtxhash".into())));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        let hash = client
            .buy_tokens(addr(0xaa), addr(0xbb), wei(1_500_000_000_000_000_000))
            .await?;

        assert_eq!(hash, "0xtxhash");
        let (method, params) = provider.recorded(0);
        assert_eq!(method, "eth_sendTransaction");
        assert_eq!(params[0]["from"], addr(0xaa).to_string());
        assert_eq!(params[0]["to"], addr(0x01).to_string());
        assert_eq!(params[0]["value"], "0x14d1120d7b160000");
        Ok(())
    }

    #[tokio::test]
    async fn transfer_ownership_never_encodes_the_refund_selector() -> anyhow::Result<()> {
        assert_ne!(
            ICrowdsale::transferTokenOwnershipCall::SELECTOR,
            ICrowdsale::refundTokensCall::SELECTOR,
        );

        let provider = MockProvider::new();
        provider.push(Ok(Value::String("0xtxhash".into())));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        client.transfer_token_ownership(addr(0xaa), addr(0xcc)).await?;

        let (method, params) = provider.recorded(0);
        assert_eq!(method, "eth_sendTransaction");
        let data = tx_data(&params);
        let expected = ICrowdsale::transferTokenOwnershipCall { newOwner: addr(0xcc) }.abi_encode();
        assert_eq!(data, hex_data(&expected));
        assert!(!data.starts_with(&hex_data(&ICrowdsale::refundTokensCall::SELECTOR)));
        Ok(())
    }

    #[tokio::test]
    async fn report_keeps_one_entry_per_address_in_listing_order() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        let listed = vec![addr(0x11), addr(0x22), addr(0x33)];
        provider.push_return(listed.clone());
        // First address resolves fully.
        provider.push_return((wei(0), false));
        provider.push_return(addr(0x07));
        provider.push_return(wei(0));
        // Second address fails on its contributor read.
        provider.push(Err(ProviderError::Transport("connection reset".into())));
        // Third address resolves fully.
        provider.push_return((wei(1_000_000_000_000_000_000), true));
        provider.push_return(addr(0x07));
        provider.push_return(wei(3_000_000_000_000_000_000));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        let report = client.balance_report().await?;

        assert_eq!(report.len(), listed.len());
        for (entry, address) in report.iter().zip(&listed) {
            assert_eq!(entry.address, *address);
        }
        assert!(report[0].snapshot.is_ok());
        assert!(report[1].snapshot.is_err());
        assert_eq!(report[2].snapshot.as_ref().unwrap().tokens, "3");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_send_leaves_the_client_usable() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.push(Err(ProviderError::Rpc {
            code: -32000,
            message: "execution reverted".into(),
        }));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        let failed = client.buy_tokens(addr(0xaa), addr(0xaa), wei(1)).await;
        assert!(failed.is_err());

        provider.push(Ok(Value::String("0xtxhash".into())));
        let hash = client.whitelist_address(addr(0xaa), addr(0xbb)).await?;
        assert_eq!(hash, "0xtxhash");
        Ok(())
    }

    #[tokio::test]
    async fn missing_contract_address_fails_actions() {
        let provider = MockProvider::new();
        let client = CrowdsaleClient::new(&provider, None);

        let result = client.refund_tokens(addr(0xaa)).await;

        assert!(matches!(result, Err(ClientError::NoContract)));
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn default_account_discovery_parses_addresses() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.push(Ok(serde_json::json!([
            addr(0xaa).to_string(),
            addr(0xbb).to_string(),
        ])));

        let accounts = provider.accounts().await?;

        assert_eq!(accounts, vec![addr(0xaa), addr(0xbb)]);
        let (method, _) = provider.recorded(0);
        assert_eq!(method, "eth_accounts");
        Ok(())
    }

    #[tokio::test]
    async fn info_reads_decode_their_fields() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.push_return("sale is active".to_owned());
        provider.push_return(wei(1_234));
        let client = CrowdsaleClient::new(&provider, Some(addr(0x01)));

        assert_eq!(client.sale_status().await?, "sale is active");
        assert_eq!(client.tokens_sold().await?, wei(1_234));
        Ok(())
    }
}
